use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
    error::ErrorForbidden,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use crate::middleware::auth::validate_jwt_from_request;

/// Gate for club management routes: staff and admin accounts only.
pub struct StaffMiddleware;

impl<S, B> Transform<S, ServiceRequest> for StaffMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = StaffMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StaffMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct StaffMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for StaffMiddlewareService<S>
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
        let service = self.service.clone();

        // Inactive accounts are already rejected during token validation
        let claims = match validate_jwt_from_request(&req) {
            Ok(claims) => claims,
            Err(e) => return Box::pin(async move { Err(e) }),
        };

        if !claims.is_staff() {
            tracing::warn!("Non-staff user attempted staff access: {} (role: {:?})", claims.username, claims.role);
            return Box::pin(async move { Err(ErrorForbidden("Insufficient privileges")) });
        }

        req.extensions_mut().insert(claims);

        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res)
        })
    }
}
