//! Trait seams for request dispatch.
//!
//! The builder never talks to the network itself: it hands a [`Request`]
//! to a [`Transport`] and lets each installed [`Interceptor`] see the
//! outcome.

mod interceptor;
mod transport;

pub use interceptor::{ErrorHook, FnInterceptor, Interceptor, SuccessHook};
pub use transport::{Method, Request, Response, Transport};
