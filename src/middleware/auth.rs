use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::auth_service;
use crate::utils::error::AppError;

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Get Authorization header
        let auth_header = req.headers().get("Authorization");

        match auth_header {
            Some(header_value) => {
                if let Ok(header_str) = header_value.to_str() {
                    if let Some(token) = header_str.strip_prefix("Bearer ") {
                        return match auth_service::verify_token(token) {
                            Ok(claims) => {
                                // Handlers pick this up via web::ReqData<Claims>
                                req.extensions_mut().insert(claims);

                                let fut = self.service.call(req);
                                Box::pin(async move {
                                    let res = fut.await?;
                                    Ok(res)
                                })
                            }
                            Err(e) => Box::pin(async move { Err(e.into()) }),
                        };
                    }
                }

                Box::pin(async move {
                    Err(AppError::Unauthorized("Invalid token format".to_string()).into())
                })
            }
            None => Box::pin(async move {
                Err(AppError::Unauthorized("No token provided".to_string()).into())
            }),
        }
    }
}
