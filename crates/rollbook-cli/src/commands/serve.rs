use crate::support::data_dir_or_exit;
use rollbook_ux::http::{HttpServerConfig, serve_roster_api};
use std::net::SocketAddr;
use std::process;

pub fn run(addr: String, path: String) {
    let bind: SocketAddr = addr.parse().unwrap_or_else(|e| {
        eprintln!("error: invalid --addr address `{addr}`: {e}");
        process::exit(1);
    });
    let data_dir = data_dir_or_exit(&path);

    let config = HttpServerConfig {
        bind,
        data_dir: data_dir.clone(),
    };

    println!("rollbook serve");
    println!("  bind: {}", bind);
    println!("  data: {}", data_dir.root().display());
    println!("  routes:");
    println!("    GET /healthz");
    println!("    GET /summary");
    println!("    GET /members[?q=<term>]");
    println!("    GET /members/<id>");
    println!("    GET /households");
    println!("    GET /families");
    println!("    GET /reminders/today[?date=YYYY-MM-DD]");
    println!("    GET /plots");

    if let Err(e) = serve_roster_api(config) {
        eprintln!("error: roster API failed: {e}");
        process::exit(1);
    }
}
