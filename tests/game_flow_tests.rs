//! End-to-end game flow tests
//!
//! These drive the registry, turn engine and room broadcast channels the
//! same way the WebSocket route does, verifying the full two-player
//! session: create, join, game-start, alternating validated moves.

use goroda::core::{
    engine::{next_required_letter, submit_move},
    JoinError, MoveError, CITY_CATALOG,
};
use goroda::models::ServerMessage;
use goroda::state::AppState;

fn recv_json(rx: &mut tokio::sync::broadcast::Receiver<String>) -> serde_json::Value {
    serde_json::from_str(&rx.try_recv().expect("expected a broadcast message")).unwrap()
}

#[tokio::test]
async fn test_full_game_flow() {
    let state = AppState::new();

    // Player 0 creates a room
    let room_id = state.registry.write().await.create_room("conn-0".to_string());
    assert_eq!(room_id.len(), 6);

    let mut creator_rx = {
        let registry = state.registry.read().await;
        registry.get_room(&room_id).unwrap().broadcast_tx.subscribe()
    };

    // Player 1 joins; game-start goes out once to the room
    {
        let mut registry = state.registry.write().await;
        let player_id = registry.join_room(&room_id, "conn-1".to_string()).unwrap();
        assert_eq!(player_id, 1);

        let session = registry.get_room(&room_id).unwrap();
        session.broadcast(&ServerMessage::GameStart);
    }
    assert_eq!(recv_json(&mut creator_rx)["type"], "game-start");
    assert!(creator_rx.try_recv().is_err());

    // Player 0 opens with Москва
    {
        let mut registry = state.registry.write().await;
        let session = registry.get_room_mut(&room_id).unwrap();

        let accepted = submit_move(session, 0, "Москва", &CITY_CATALOG).unwrap();
        session.broadcast(&ServerMessage::Move {
            city: accepted.city,
            player_id: accepted.player_index,
            next_turn: accepted.next_turn,
        });

        assert_eq!(session.required_letter, Some('а'));
        assert_eq!(session.turn, 1);
    }

    let move_msg = recv_json(&mut creator_rx);
    assert_eq!(move_msg["type"], "move");
    assert_eq!(move_msg["city"], "Москва");
    assert_eq!(move_msg["player_id"], 0);
    assert_eq!(move_msg["next_turn"], 1);

    // Player 1 answers with Астана (starts with "а")
    {
        let mut registry = state.registry.write().await;
        let session = registry.get_room_mut(&room_id).unwrap();

        submit_move(session, 1, "Астана", &CITY_CATALOG).unwrap();
        assert_eq!(session.required_letter, Some('а'));
        assert_eq!(session.turn, 0);
    }

    // Player 0 plays Астрахань; the trailing "ь" is stripped
    {
        let mut registry = state.registry.write().await;
        let session = registry.get_room_mut(&room_id).unwrap();

        submit_move(session, 0, "Астрахань", &CITY_CATALOG).unwrap();
        assert_eq!(session.required_letter, Some('н'));
        assert_eq!(session.turn, 1);
        assert_eq!(session.history.len(), 3);
        assert_eq!(session.used_cities.len(), 3);
    }
}

#[tokio::test]
async fn test_join_errors() {
    let state = AppState::new();

    let mut registry = state.registry.write().await;
    assert_eq!(
        registry.join_room("NOSUCH", "conn-1".to_string()),
        Err(JoinError::RoomNotFound)
    );

    let room_id = registry.create_room("conn-0".to_string());
    registry.join_room(&room_id, "conn-1".to_string()).unwrap();
    assert_eq!(
        registry.join_room(&room_id, "conn-2".to_string()),
        Err(JoinError::RoomFull)
    );
}

#[tokio::test]
async fn test_rejected_moves_do_not_broadcast() {
    let state = AppState::new();

    let room_id = state.registry.write().await.create_room("conn-0".to_string());
    let mut rx = {
        let registry = state.registry.read().await;
        registry.get_room(&room_id).unwrap().broadcast_tx.subscribe()
    };

    let mut registry = state.registry.write().await;
    registry.join_room(&room_id, "conn-1".to_string()).unwrap();
    let session = registry.get_room_mut(&room_id).unwrap();

    // Out of turn, unknown city, then a real move followed by a duplicate
    assert_eq!(
        submit_move(session, 1, "Москва", &CITY_CATALOG),
        Err(MoveError::OutOfTurn)
    );
    assert_eq!(
        submit_move(session, 0, "Нарния", &CITY_CATALOG),
        Err(MoveError::UnknownCity)
    );

    submit_move(session, 0, "Казань", &CITY_CATALOG).unwrap();
    assert_eq!(
        submit_move(session, 1, " КАЗАНЬ ", &CITY_CATALOG),
        Err(MoveError::DuplicateCity)
    );
    assert_eq!(
        submit_move(session, 1, "Москва", &CITY_CATALOG),
        Err(MoveError::WrongLetter('н'))
    );

    // Only accepted moves would have been broadcast; none were sent here
    assert!(rx.try_recv().is_err());

    // Session advanced exactly once
    assert_eq!(session.history.len(), 1);
    assert_eq!(session.turn, 1);
    assert_eq!(session.required_letter, next_required_letter("Казань"));
}

#[tokio::test]
async fn test_rooms_are_independent() {
    let state = AppState::new();
    let mut registry = state.registry.write().await;

    let room_a = registry.create_room("conn-a0".to_string());
    let room_b = registry.create_room("conn-b0".to_string());
    registry.join_room(&room_a, "conn-a1".to_string()).unwrap();
    registry.join_room(&room_b, "conn-b1".to_string()).unwrap();

    // The same city is legal in both rooms
    let session_a = registry.get_room_mut(&room_a).unwrap();
    submit_move(session_a, 0, "Минск", &CITY_CATALOG).unwrap();

    let session_b = registry.get_room_mut(&room_b).unwrap();
    submit_move(session_b, 0, "Минск", &CITY_CATALOG).unwrap();

    assert_eq!(registry.get_room(&room_a).unwrap().history.len(), 1);
    assert_eq!(registry.get_room(&room_b).unwrap().history.len(), 1);
}

#[tokio::test]
async fn test_health_endpoint_reports_rooms() {
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    let state = AppState::new();
    state.registry.write().await.create_room("conn-0".to_string());

    let app = Router::new()
        .route("/health", get(goroda::routes::health::health_check))
        .with_state(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["rooms"]["total_rooms"], 1);
    assert!(body["catalog_cities"].as_u64().unwrap() > 0);
}
