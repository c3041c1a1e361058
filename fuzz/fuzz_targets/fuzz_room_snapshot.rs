#![no_main]

use libfuzzer_sys::fuzz_target;
use nexus_lobby_client::protocol::RoomSnapshot;
use nexus_lobby_client::{RoomView, Session};

fuzz_target!(|data: &[u8]| {
    let Ok(snapshot) = serde_json::from_slice::<RoomSnapshot>(data) else {
        return;
    };

    // Any decodable snapshot must derive a view for every kind of session.
    let host = Session::authenticated("t", snapshot.host_name.clone());
    for session in [Session::anonymous(), host] {
        let view = RoomView::derive(Some(&snapshot), &session);
        if !session.is_authenticated() {
            assert!(view.available_actions().is_empty());
        }
        if let Some(model) = view.as_room() {
            let _ = model.participant_rows().count();
            let _ = model.occupancy();
        }
    }
});
