#![no_main]

use libfuzzer_sys::fuzz_target;
use nexus_lobby_client::protocol::{ApiResponse, LoginResponse};

fuzz_target!(|data: &[u8]| {
    // Exercise the raw-byte path (includes serde_json's UTF-8 validation).
    if let Ok(envelope) = serde_json::from_slice::<ApiResponse<LoginResponse>>(data) {
        let _ = envelope.failure_message();
    }

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = serde_json::from_str::<ApiResponse<serde_json::Value>>(s);
    }
});
