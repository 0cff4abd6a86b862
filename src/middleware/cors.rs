//! 跨域中间件
//!
//! 允许任意来源访问：预检请求直接返回 204，其余响应追加
//! `Access-Control-Allow-Origin: *`

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{
            HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS,
            ACCESS_CONTROL_REQUEST_METHOD,
        },
        Method,
    },
    Error, HttpResponse,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

const ALLOWED_METHODS: &str = "GET, OPTIONS";
/// 预检结果缓存时间（秒）
const PREFLIGHT_MAX_AGE: &str = "86400";

/// 开放跨域中间件
#[derive(Default)]
pub struct OpenCors;

impl OpenCors {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for OpenCors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = OpenCorsService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(OpenCorsService {
            service: Rc::new(service),
        })
    }
}

pub struct OpenCorsService<S> {
    service: Rc<S>,
}

fn is_preflight(req: &ServiceRequest) -> bool {
    req.method() == Method::OPTIONS && req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

impl<S, B> Service<ServiceRequest> for OpenCorsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            if is_preflight(&req) {
                let mut response = HttpResponse::NoContent();
                response
                    .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
                    .insert_header((ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
                    .insert_header((ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE));

                // 原样允许前端请求的头
                if let Some(requested) = req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS) {
                    response.insert_header((ACCESS_CONTROL_ALLOW_HEADERS, requested.clone()));
                }

                return Ok(req.into_response(response.finish()).map_into_right_body());
            }

            let mut res = service.call(req).await?;
            res.headers_mut()
                .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
            Ok(res.map_into_left_body())
        })
    }
}
