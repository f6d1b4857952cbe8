//! Frame-to-lamp flow: decode stream frames, fold them into a snapshot,
//! and drive a recording indicator through the deduplicating controller.

use lamp_proto::StreamMessage;
use lampd::error::LampError;
use lampd::indicator::{Indicator, LampColor, LampController};
use lampd::rules::{self, StatusSnapshot};

#[derive(Default)]
struct RecordingIndicator {
    shown: Vec<LampColor>,
}

impl Indicator for RecordingIndicator {
    fn set_color(&mut self, color: LampColor) -> Result<(), LampError> {
        self.shown.push(color);
        Ok(())
    }
}

fn feed(
    snapshot: &mut StatusSnapshot,
    lamp: &mut LampController<RecordingIndicator>,
    frame: &str,
) {
    let message = StreamMessage::from_json(frame).expect("valid frame");
    snapshot.apply(&message);
    lamp.show(rules::color_for(snapshot)).expect("lamp write");
}

#[test]
fn stream_frames_drive_the_lamp() {
    let mut snapshot = StatusSnapshot::new();
    let mut lamp = LampController::new(RecordingIndicator::default());

    feed(
        &mut snapshot,
        &mut lamp,
        r#"{"type":"state_update","services":[
            {"name":"api","health":"ok"},
            {"name":"db","health":"ok"}
        ],"timestamp":"2026-03-01T12:00:00Z"}"#,
    );

    feed(
        &mut snapshot,
        &mut lamp,
        r#"{"type":"state_update","services":[
            {"name":"api","health":"ok"},
            {"name":"db","health":"degraded"}
        ],"timestamp":"2026-03-01T12:00:10Z"}"#,
    );

    feed(
        &mut snapshot,
        &mut lamp,
        r#"{"type":"event","name":"pager_fired","severity":"critical",
            "message":"db primary unreachable","timestamp":"2026-03-01T12:00:20Z"}"#,
    );

    feed(
        &mut snapshot,
        &mut lamp,
        r#"{"type":"state_update","services":[
            {"name":"api","health":"ok"},
            {"name":"db","health":"ok"}
        ],"timestamp":"2026-03-01T12:01:00Z"}"#,
    );

    assert_eq!(
        lamp_colors(&lamp),
        vec![
            LampColor::Green,
            LampColor::Amber,
            LampColor::Red,
            LampColor::Green
        ]
    );
}

#[test]
fn repeated_identical_states_write_once() {
    let mut snapshot = StatusSnapshot::new();
    let mut lamp = LampController::new(RecordingIndicator::default());

    let healthy = r#"{"type":"state_update","services":[
        {"name":"api","health":"ok"}
    ],"timestamp":"2026-03-01T12:00:00Z"}"#;

    feed(&mut snapshot, &mut lamp, healthy);
    feed(&mut snapshot, &mut lamp, healthy);
    feed(&mut snapshot, &mut lamp, healthy);

    assert_eq!(lamp_colors(&lamp), vec![LampColor::Green]);
}

#[test]
fn info_events_do_not_change_the_lamp() {
    let mut snapshot = StatusSnapshot::new();
    let mut lamp = LampController::new(RecordingIndicator::default());

    feed(
        &mut snapshot,
        &mut lamp,
        r#"{"type":"state_update","services":[
            {"name":"api","health":"ok"}
        ],"timestamp":"2026-03-01T12:00:00Z"}"#,
    );

    feed(
        &mut snapshot,
        &mut lamp,
        r#"{"type":"event","name":"deploy_finished","severity":"info",
            "message":null,"timestamp":"2026-03-01T12:00:05Z"}"#,
    );

    assert_eq!(lamp_colors(&lamp), vec![LampColor::Green]);
}

fn lamp_colors(lamp: &LampController<RecordingIndicator>) -> Vec<LampColor> {
    lamp.indicator().shown.clone()
}
