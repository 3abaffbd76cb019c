use async_trait::async_trait;

use crate::errors::PicaResult;

/// One operation of the service, driven by a command value.
///
/// Orchestrators implement this once per command type they accept, so a
/// single orchestrator can serve several related commands:
///
/// ```rust
/// use async_trait::async_trait;
/// use pica_core::{PicaResult, UseCase};
///
/// struct Ping;
/// struct Echo;
///
/// #[async_trait]
/// impl UseCase<Ping> for Echo {
///     type Output = &'static str;
///
///     async fn execute(&self, _command: Ping) -> PicaResult<Self::Output> {
///         Ok("pong")
///     }
/// }
/// ```
#[async_trait]
pub trait UseCase<C>: Send + Sync
where
    C: Send + 'static,
{
    type Output: Send;

    async fn execute(&self, command: C) -> PicaResult<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, PicaError};

    struct Double;
    struct Fail;

    struct Doubler;

    #[async_trait]
    impl UseCase<Double> for Doubler {
        type Output = u32;

        async fn execute(&self, _command: Double) -> PicaResult<u32> {
            Ok(42)
        }
    }

    #[async_trait]
    impl UseCase<Fail> for Doubler {
        type Output = ();

        async fn execute(&self, _command: Fail) -> PicaResult<()> {
            Err(PicaError::not_found("nothing here"))
        }
    }

    #[tokio::test]
    async fn one_orchestrator_serves_several_commands() {
        let uc = Doubler;
        assert_eq!(uc.execute(Double).await.unwrap(), 42);

        let err = uc.execute(Fail).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
