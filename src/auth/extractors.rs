use actix_web::{error::ErrorUnauthorized, web, FromRequest};
use futures_util::future::{ready, Ready};

use super::jwt::{Tokenizer, UserRole};

// Extractor for admin role
pub struct IsAdmin(pub i32);

// Extractor for any logged in user; second field marks admin privilege
pub struct IsUser(pub i32, pub bool);

fn bearer_token(req: &actix_web::HttpRequest) -> Option<String>{
    let auth = req.headers().get("Authorization")?;
    let split: Vec<&str> = auth.to_str().ok()?.split("Bearer").collect();

    Some(split.get(1)?.trim().to_string())
}

impl FromRequest for IsAdmin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let tokenizer: &web::Data<Tokenizer> = req.app_data().unwrap();

        match bearer_token(req) {
            Some(token) => {
                match tokenizer.decode_key(token){
                    Some(r) => {
                        match r.role {
                            UserRole::ADMIN => ready(Ok(IsAdmin(r.sub))),
                            _ => ready(Err(ErrorUnauthorized("Unauthorized Role")))
                        }
                    },
                    None => ready(Err(ErrorUnauthorized("Invalid Token")))
                }
            },
            None => ready(Err(ErrorUnauthorized("Invalid token")))
        }
    }
}


impl FromRequest for IsUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let tokenizer: &web::Data<Tokenizer> = req.app_data().unwrap();

        match bearer_token(req) {
            Some(token) => {
                match tokenizer.decode_key(token){
                    Some(r) => {
                        match r.role {
                            UserRole::CUSTOMER => ready(Ok(IsUser(r.sub, false))),
                            UserRole::ADMIN => ready(Ok(IsUser(r.sub, true)))
                        }
                    },
                    None => ready(Err(ErrorUnauthorized("Invalid Token")))
                }
            },
            None => ready(Err(ErrorUnauthorized("Invalid token")))
        }
    }
}
