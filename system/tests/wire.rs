use paint_system::{ClientMessage, Color, DrawLog, SessionRegistry, ServerMessage};

// Shapes as emitted by the browser client, colour picker output included.
const BROWSER_DRAW: &str = r##"{"event":"drawLine","data":{"from":{"x":-15,"y":40},"to":{"x":-10,"y":40},"color":"#FF00FFCC"}}"##;
const BROWSER_MOVE: &str = r#"{"event":"updatePosition","data":{"x":-10,"y":40}}"#;

#[test]
fn it_replays_browser_events_into_state() {
    let mut registry = SessionRegistry::new();
    let mut log = DrawLog::new();
    registry.on_connect(1, Color::from("#123456"));

    for text in &[BROWSER_MOVE, BROWSER_DRAW] {
        match ClientMessage::from_json(text).expect("browser payload must parse") {
            ClientMessage::UpdatePosition(position) => {
                assert!(registry.update_position(&1, position));
            }
            ClientMessage::DrawLine(segment) => log.append(segment),
            other => panic!("unexpected message {:?}", other),
        }
    }

    assert_eq!(registry.get(&1).unwrap().x, -10.0);
    assert_eq!(log.all()[0].color.as_str(), "#FF00FFCC");

    let echoed = ServerMessage::DrawLine(log.all()[0].clone())
        .to_json()
        .expect("must encode");
    assert_eq!(
        ServerMessage::from_json(&echoed).unwrap(),
        ServerMessage::DrawLine(log.all()[0].clone())
    );
}
