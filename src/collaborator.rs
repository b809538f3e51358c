use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::envelope::Envelope;
use crate::error::BoxError;

/// Hands an outbound envelope to the channel. Used for posts, requests and
/// replies alike.
#[async_trait]
pub trait Outbound<U = ()>: Send + Sync
where
    U: Send + 'static,
{
    async fn send(&self, envelope: Envelope, context: Option<U>) -> Result<(), BoxError>;
}

/// Answers inbound requests and posts. The result becomes the reply payload;
/// it is discarded for posts.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, data: Value) -> Result<Value, BoxError>;
}

pub struct FnOutbound<F> {
    func: Arc<F>,
}

impl<F> FnOutbound<F> {
    pub fn new(func: F) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

#[async_trait]
impl<U, F, Fut> Outbound<U> for FnOutbound<F>
where
    U: Send + 'static,
    F: Fn(Envelope, Option<U>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    async fn send(&self, envelope: Envelope, context: Option<U>) -> Result<(), BoxError> {
        (self.func)(envelope, context).await
    }
}

pub struct FnResponder<F> {
    func: Arc<F>,
}

impl<F, Fut> FnResponder<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    pub fn new(func: F) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

#[async_trait]
impl<F, Fut> Responder for FnResponder<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    async fn respond(&self, data: Value) -> Result<Value, BoxError> {
        (self.func)(data).await
    }
}

/// Responder that decodes the payload into `Req` and encodes the `Resp`.
pub struct TypedResponder<Req, Resp, F> {
    func: Arc<F>,
    _phantom: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp, F, Fut> TypedResponder<Req, Resp, F>
where
    Req: DeserializeOwned + Send + 'static,
    Resp: Serialize + Send + 'static,
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Resp, BoxError>> + Send + 'static,
{
    pub fn new(func: F) -> Self {
        Self {
            func: Arc::new(func),
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<Req, Resp, F, Fut> Responder for TypedResponder<Req, Resp, F>
where
    Req: DeserializeOwned + Send + 'static,
    Resp: Serialize + Send + 'static,
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Resp, BoxError>> + Send + 'static,
{
    async fn respond(&self, data: Value) -> Result<Value, BoxError> {
        let req: Req = serde_json::from_value(data)?;
        let resp = (self.func)(req).await?;
        Ok(serde_json::to_value(resp)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct AddRequest {
        a: i32,
        b: i32,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct AddResponse {
        result: i32,
    }

    #[tokio::test]
    async fn test_fn_responder() {
        let responder = FnResponder::new(|data: Value| async move { Ok(json!([data, data])) });
        assert_eq!(responder.respond(json!(1)).await.unwrap(), json!([1, 1]));
    }

    #[tokio::test]
    async fn test_typed_responder() {
        let responder = TypedResponder::new(|req: AddRequest| async move {
            Ok(AddResponse {
                result: req.a + req.b,
            })
        });

        let reply = responder.respond(json!({"a": 10, "b": 32})).await.unwrap();
        assert_eq!(reply, json!({"result": 42}));
    }

    #[tokio::test]
    async fn test_typed_responder_rejects_bad_payload() {
        let responder = TypedResponder::new(|req: AddRequest| async move {
            Ok(AddResponse {
                result: req.a + req.b,
            })
        });

        assert!(responder.respond(json!("not a request")).await.is_err());
    }

    #[tokio::test]
    async fn test_fn_outbound_passes_context() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let outbound = FnOutbound::new(move |envelope: Envelope, context: Option<u32>| {
            let sink = sink.clone();
            async move {
                sink.lock().push((envelope, context));
                Ok::<(), BoxError>(())
            }
        });

        Outbound::send(&outbound, Envelope::post(json!("hi")), Some(7))
            .await
            .unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, Some(7));
        assert!(seen[0].0.is_post());
    }
}
