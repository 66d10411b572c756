use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenSigner;
use crate::error::AppError;
use crate::store::UserStore;

/// Verifies `Authorization: Bearer <jwt>` and stores the decoded
/// [`Claims`](super::Claims) in the request extensions.
///
/// A token whose subject no longer has an account is rejected like a bad one.
pub struct AuthMiddleware {
    signer: Rc<TokenSigner>,
    users: Arc<dyn UserStore>,
}

impl AuthMiddleware {
    pub fn new(signer: TokenSigner, users: Arc<dyn UserStore>) -> Self {
        Self {
            signer: Rc::new(signer),
            users,
        }
    }
}

/// Routes reachable without a token.
fn is_public(method: &Method, path: &str) -> bool {
    path == "/health"
        || (method == Method::POST && (path == "/users" || path == "/users/login"))
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            signer: Rc::clone(&self.signer),
            users: Arc::clone(&self.users),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    signer: Rc<TokenSigner>,
    users: Arc<dyn UserStore>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public(req.method(), req.path()) {
            return Box::pin(self.service.call(req));
        }

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            let app_err = AppError::Unauthorized("Please authenticate.".into());
            return Box::pin(async move { Err(app_err.into()) });
        };

        let claims = match self.signer.verify(token) {
            Ok(claims) => claims,
            Err(app_err) => {
                log::debug!("rejected token on {}: {}", req.path(), app_err);
                return Box::pin(async move { Err(app_err.into()) });
            }
        };

        let service = Rc::clone(&self.service);
        let users = Arc::clone(&self.users);
        Box::pin(async move {
            match users.find_user(claims.sub).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    log::debug!("rejected token for missing user {}", claims.sub);
                    let app_err = AppError::Unauthorized("Please authenticate.".into());
                    return Err(app_err.into());
                }
                Err(e) => return Err(AppError::from(e).into()),
            }
            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
