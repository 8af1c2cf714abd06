use actix_web::{get, HttpResponse, Responder};

use crate::error::Error;

#[get("/health")]
async fn index() -> Result<impl Responder, Error> {
    Ok(HttpResponse::Ok().body("OK"))
}
