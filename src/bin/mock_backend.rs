// src/bin/mock_backend.rs
//
// Local stand-in for the calculation service, for trying the form without
// reaching the hosted backend. Point SRWTO_BASE_URL at http://127.0.0.1:<PORT>.
use dotenv::dotenv;
use env_logger;
use log::{info, warn};
use serde_json::{json, Value};
use std::env;
use std::net::SocketAddr;
use warp::http::{Response, StatusCode};
use warp::Filter;

// Smallest well-formed single-page PDF.
const SAMPLE_PDF: &[u8] = b"%PDF-1.4
1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj
2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj
3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] >> endobj
trailer << /Root 1 0 R >>
%%EOF
";

fn canned_result(payload: &Value) -> Value {
    json!({
        "baseline": { "dscr": 1.8 },
        "suggestion": {
            "final_dscr": 2.6,
            "adjusted_inputs": {
                "days_per_month": payload["days_per_month"],
                "drawings_annual": 24000.0,
                "others_annual": 12000.0
            }
        },
        "received": payload
    })
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3030");
        "3030".to_string()
    });
    let port: u16 = match port_str.parse() {
        Ok(port) => port,
        Err(_) => {
            warn!("PORT '{}' is not a number, defaulting to 3030", port_str);
            3030
        }
    };
    let addr: SocketAddr = ([127, 0, 0, 1], port).into();

    let compute = warp::path!("menus" / "dscr")
        .and(warp::post())
        .and(warp::body::json())
        .map(|payload: Value| {
            info!("Compute request: {}", payload);
            warp::reply::json(&canned_result(&payload))
        });

    let document = warp::path!("menus" / "dscr_exact")
        .and(warp::post())
        .and(warp::body::json())
        .map(|payload: Value| {
            info!("Document request: {}", payload);
            Response::builder()
                .status(StatusCode::OK)
                .header("content-type", "application/pdf")
                .body(SAMPLE_PDF.to_vec())
        });

    info!("Mock calculation service listening on {}", addr);
    warp::serve(compute.or(document)).run(addr).await;
}
