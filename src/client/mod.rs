//! Resilient HTTP request client

pub mod classifier;
pub mod error;
pub mod interceptor;
pub mod request_client;
pub mod retry;
pub mod transport;

pub use classifier::{BusinessCodeClassifier, ResponseClassifier, StatusClassifier, OK_CODE};
pub use error::{ErrorKind, RequestError};
pub use interceptor::{Interceptor, NetworkLogInterceptor};
pub use request_client::{
    base_url_from_env, base_url_from_lookup, ClientBuilder, RequestClient, Response,
    BRIDGE_CONFIG_TIMEOUT, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ENV_BASE_URL,
};
pub use retry::{
    DefaultRetryPredicate, RetryPolicy, RetryPredicate, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES,
};
pub use transport::{
    OutboundRequest, RawResponse, Request, ReqwestTransport, Transport, TransportFailure,
    TransportFailureKind,
};
