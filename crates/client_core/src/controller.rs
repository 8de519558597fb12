use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use shared::domain::Command;
use tokio::task::JoinHandle;

use crate::{
    command::CommandSender,
    config::ControllerSettings,
    control_state::{ControlState, Pedal},
    error::SessionError,
    orientation::{OrientationEstimator, SensorKind, Vector3},
    session::{SessionStatus, StreamingSession},
    touch::TouchZone,
    transport::{DatagramTransport, Endpoint, UdpTransport},
};

pub struct Controller {
    estimator: Mutex<OrientationEstimator>,
    state: Arc<ControlState>,
    session: StreamingSession,
    commands: Arc<CommandSender>,
}

impl Controller {
    pub fn new(settings: &ControllerSettings) -> Self {
        Self::with_transport(
            settings.endpoint(),
            settings.send_interval(),
            Arc::new(UdpTransport),
        )
    }

    pub fn with_transport(
        endpoint: Endpoint,
        interval: Duration,
        transport: Arc<dyn DatagramTransport>,
    ) -> Self {
        let state = Arc::new(ControlState::new());
        Self {
            estimator: Mutex::new(OrientationEstimator::new()),
            session: StreamingSession::new(
                endpoint.clone(),
                Arc::clone(&transport),
                Arc::clone(&state),
                interval,
            ),
            commands: Arc::new(CommandSender::new(endpoint, transport)),
            state,
        }
    }

    /// Feeds one raw sensor reading and republishes the roll on a new fix.
    pub fn on_sensor(&self, kind: SensorKind, vector: Vector3) {
        let mut estimator = match self.estimator.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if estimator.update(kind, vector) {
            self.state.set_roll(estimator.roll_degrees());
        }
    }

    pub fn touch_zone(&self, pedal: Pedal, height: f32) -> TouchZone {
        TouchZone::new(pedal, height, Arc::clone(&self.state))
    }

    pub fn control_state(&self) -> &Arc<ControlState> {
        &self.state
    }

    pub fn roll_degrees(&self) -> i32 {
        self.state.roll()
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn session(&self) -> &StreamingSession {
        &self.session
    }

    pub async fn start(&self) -> Result<(), SessionError> {
        self.session.start().await
    }

    pub async fn stop(&self) {
        self.session.stop().await
    }

    pub async fn toggle(&self) -> Result<SessionStatus, SessionError> {
        self.session.toggle().await
    }

    /// Owning context went to the background: stop streaming.
    pub async fn pause(&self) {
        self.session.stop().await
    }

    pub async fn send_command(&self, command: Command) {
        self.commands.send_command(command).await
    }

    pub fn spawn_command(&self, command: Command) -> JoinHandle<()> {
        self.commands.spawn_command(command)
    }
}
