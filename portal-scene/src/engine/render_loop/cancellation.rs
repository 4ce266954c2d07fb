use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy::prelude::*;

/// Shared stop flag for the render loop.
///
/// Clones observe the same flag, so a handle kept outside the app (a test, a
/// page teardown hook) can stop the loop cleanly.
#[derive(Resource, Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub fn exit_on_cancel(token: Res<CancellationToken>, mut exit: EventWriter<AppExit>) {
    if token.is_cancelled() {
        info!("Render loop cancelled, requesting exit");
        exit.write(AppExit::Success);
    }
}
