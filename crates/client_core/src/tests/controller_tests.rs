use std::{sync::Arc, time::Duration};

use shared::domain::Command;

use crate::{
    control_state::Pedal,
    controller::Controller,
    orientation::{gravity_for_roll, SensorKind},
    session::SessionStatus,
    test_support::{test_endpoint, wait_until, RecordingTransport},
};

const MAGNETIC: [f32; 3] = [22.0, 5.0, -40.0];

fn controller(transport: &RecordingTransport) -> Controller {
    Controller::with_transport(
        test_endpoint(),
        Duration::from_millis(5),
        Arc::new(transport.clone()),
    )
}

#[test]
fn roll_stays_zero_until_both_sensors_report() {
    let transport = RecordingTransport::new();
    let controller = controller(&transport);

    controller.on_sensor(SensorKind::Gravity, gravity_for_roll(40.0));
    assert_eq!(controller.roll_degrees(), 0);

    controller.on_sensor(SensorKind::Magnetic, MAGNETIC);
    assert!((39..=40).contains(&controller.roll_degrees()));
}

#[tokio::test]
async fn tilt_and_pedals_reach_the_wire() {
    let transport = RecordingTransport::new();
    let controller = controller(&transport);
    let throttle = controller.touch_zone(Pedal::Throttle, 100.0);
    let brake = controller.touch_zone(Pedal::Brake, 100.0);

    controller.on_sensor(SensorKind::Gravity, [0.0, 0.0, 9.81]);
    controller.on_sensor(SensorKind::Magnetic, MAGNETIC);
    throttle.press(25.0);
    brake.press(100.0);

    assert_eq!(controller.toggle().await.expect("toggle"), SessionStatus::Sending);
    let recorded = Arc::clone(&transport.recorded);
    assert!(wait_until(Duration::from_secs(2), || recorded.sent() >= 1).await);

    throttle.release();
    assert!(
        wait_until(Duration::from_secs(2), || recorded
            .payloads()
            .last()
            .is_some_and(|p| p == "0,0,0"))
        .await
    );

    controller.pause().await;
    assert_eq!(controller.status(), SessionStatus::Idle);
    assert_eq!(transport.recorded.payloads()[0], "0,24575,0");
    assert_eq!(transport.recorded.released(), 1);
}

#[tokio::test]
async fn command_bypasses_control_state() {
    let transport = RecordingTransport::new();
    let controller = controller(&transport);
    controller.control_state().set_roll(12);

    controller.send_command(Command::Restart).await;

    assert_eq!(transport.recorded.payloads(), vec!["RESTART".to_string()]);
    assert_eq!(controller.status(), SessionStatus::Idle);
}
