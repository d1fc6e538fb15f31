// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::api::ApiException;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by the paging and polling helpers.
///
/// The helpers report errors from multiple sources. For example, the service
/// may return an error, the transport may be unable to create the necessary
/// connection to make a request, the polling policy may be exhausted, or the
/// statement may be invalid.
///
/// Most applications will just return the error or log it, without any further
/// action. However, some applications may need to interrogate the error
/// details. This type offers a series of predicates to determine the error
/// kind. Applications can query the error [source][std::error::Error::source]
/// for deeper information.
///
/// # Example
/// ```
/// use ads_gax::error::Error;
/// match example_function() {
///     Err(e) if e.status().is_some_and(|s| s.is_transient()) => {
///         println!("the service is busy, try again later: {e}");
///     },
///     Err(e) if e.is_configuration() => { println!("fix the statement {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use ads_gax::error::api::ApiException;
///     # Err(Error::service(ApiException::new().set_message("NOT FOUND")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error representing invalid local inputs.
    ///
    /// # Example
    /// ```
    /// use ads_gax::error::Error;
    /// let error = Error::configuration(statement::Error::UnboundVariable("id".into()));
    /// assert!(error.is_configuration());
    /// ```
    pub fn configuration<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::Configuration, source)
    }

    /// The request was not sent because its inputs are invalid.
    ///
    /// This is always a client-side generated error, detected before any
    /// request is made. The error never resolves on its own, repeating the
    /// operation with the same inputs fails again.
    ///
    /// # Troubleshooting
    ///
    /// The most common causes are a non-positive page size, a page size larger
    /// than the maximum supported by the service, or a placeholder in the
    /// filter without a value. Examine the error source for details.
    pub fn is_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::Configuration)
    }

    /// Creates an error with the information returned by the service.
    ///
    /// # Example
    /// ```
    /// use ads_gax::error::Error;
    /// use ads_gax::error::api::ApiException;
    /// let exception = ApiException::new().set_message("NOT FOUND");
    /// let error = Error::service(exception.clone());
    /// assert_eq!(error.status(), Some(&exception));
    /// ```
    pub fn service(exception: ApiException) -> Self {
        Self {
            kind: ErrorKind::Service(Box::new(exception)),
            source: None,
        }
    }

    /// The [ApiException] payload associated with this error.
    ///
    /// # Troubleshooting
    ///
    /// As this error type is created by the service, troubleshooting this
    /// problem typically involves reading the service documentation for each
    /// `error_string` in [ApiException::errors]. Statement syntax errors are
    /// only detected by the service and are reported this way.
    pub fn status(&self) -> Option<&ApiException> {
        match &self.kind {
            ErrorKind::Service(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// Creates an error representing a transport problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use ads_gax::error::Error;
    /// let error = Error::io("connection reset");
    /// assert!(error.is_io());
    /// assert!(error.source().is_some());
    /// ```
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::Io, source)
    }

    /// The request could not be sent, or the response could not be received.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use ads_gax::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::Timeout, source)
    }

    /// The request could not be completed before its deadline.
    ///
    /// This is always a client-side generated error. Note that the request may
    /// or may not have started, and it may or may not complete in the service.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing an exhausted policy.
    ///
    /// # Example
    /// ```
    /// use ads_gax::error::Error;
    /// let error = Error::exhausted("too many polling attempts");
    /// assert!(error.is_exhausted());
    /// ```
    pub fn exhausted<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::Exhausted, source)
    }

    /// The polling loop stopped before the job completed.
    ///
    /// This is always a client-side generated error. The job may still
    /// complete in the service.
    ///
    /// # Troubleshooting
    ///
    /// Large reports can take a long time to run. If your application can
    /// tolerate longer waits, extend the polling limit.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, ErrorKind::Exhausted)
    }

    /// Creates an error representing a deserialization problem.
    ///
    /// # Example
    /// ```
    /// use ads_gax::error::Error;
    /// let error = Error::deser("unexpected field");
    /// assert!(error.is_deserialization());
    /// ```
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::Deserialization, source)
    }

    /// The response could not be deserialized.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    #[doc(hidden)]
    pub fn other<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::Other, source)
    }

    fn with_source<T: Into<BoxError>>(kind: ErrorKind, source: T) -> Self {
        Self {
            kind,
            source: Some(source.into()),
        }
    }

    /// Returns true if the same request may succeed on a future attempt.
    pub(crate) fn is_transient(&self) -> bool {
        match &self.kind {
            ErrorKind::Io | ErrorKind::Timeout => true,
            ErrorKind::Service(e) => e.is_transient(),
            _ => false,
        }
    }
}

impl std::convert::From<statement::Error> for Error {
    fn from(value: statement::Error) -> Self {
        Self::configuration(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Configuration, Some(e)) => {
                write!(f, "the request is not valid and was not sent: {e}")
            }
            (ErrorKind::Service(e), _) => {
                write!(f, "the service reports an error: {e}")
            }
            (ErrorKind::Io, Some(e)) => write!(f, "the transport reports an error: {e}"),
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the request deadline {e}")
            }
            (ErrorKind::Exhausted, Some(e)) => write!(f, "{e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Other, Some(e)) => {
                write!(f, "an unclassified problem making a request: {e}")
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

#[derive(Debug)]
enum ErrorKind {
    Configuration,
    Service(Box<ApiException>),
    Io,
    Timeout,
    Exhausted,
    Deserialization,
    Other,
}
