// src/handlers/servers.rs
use crate::geo::{append_geo, GeoDatabase};
use crate::models::server::ServerKind;
use crate::storage::memory::ServerStorage;
use actix_web::{web, HttpResponse};
use log::debug;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/servers", web::get().to(get_game_servers))
        .route("/proxies", web::get().to(get_proxies))
        .route("/qtv", web::get().to(get_qtv_servers))
        .route("/server_to_qtv", web::get().to(get_server_to_qtv))
        .route("/qtv_to_server", web::get().to(get_qtv_to_server));
}

fn servers_of_kind(storage: &ServerStorage, geo: &GeoDatabase, kind: ServerKind) -> HttpResponse {
    let servers = storage.get_servers_of_kind(kind);
    debug!("Building {:?} list response with {} servers", kind, servers.len());
    HttpResponse::Ok().json(append_geo(servers, geo))
}

pub async fn get_game_servers(storage: web::Data<ServerStorage>, geo: web::Data<GeoDatabase>) -> HttpResponse {
    servers_of_kind(&storage, &geo, ServerKind::GameServer)
}

pub async fn get_proxies(storage: web::Data<ServerStorage>, geo: web::Data<GeoDatabase>) -> HttpResponse {
    servers_of_kind(&storage, &geo, ServerKind::Proxy)
}

pub async fn get_qtv_servers(storage: web::Data<ServerStorage>, geo: web::Data<GeoDatabase>) -> HttpResponse {
    servers_of_kind(&storage, &geo, ServerKind::Qtv)
}

pub async fn get_server_to_qtv(storage: web::Data<ServerStorage>) -> HttpResponse {
    HttpResponse::Ok().json(storage.server_to_qtv())
}

pub async fn get_qtv_to_server(storage: web::Data<ServerStorage>) -> HttpResponse {
    HttpResponse::Ok().json(storage.qtv_to_server())
}
