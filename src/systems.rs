//! Backend-independent climbing systems and events.

use bevy::prelude::*;

use crate::motor::{ClimbTick, ClimbingMotor};
use crate::state::{Climbing, Slipping, WallEjected};

/// Sent once per climb attempt when the grip first takes.
///
/// Hook this up to a HUD notification ("climbing mode").
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ClimbingModeMessage {
    /// The climbing character.
    pub entity: Entity,
}

/// Sent on the tick the player jumps or crouches off a wall in advanced mode.
///
/// Consumed by the jump/dismount system to push the character away.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WallEjectEvent {
    /// The ejected character.
    pub entity: Entity,
    /// Horizontal direction pointing out of the wall that was let go.
    pub away_from_wall: Vec3,
}

/// Forward the outputs of a motor tick as events.
///
/// Called by backends right after [`ClimbingMotor::tick`].
pub fn publish_tick(
    entity: Entity,
    tick: &ClimbTick,
    motor: &ClimbingMotor,
    messages: &mut EventWriter<ClimbingModeMessage>,
    ejects: &mut EventWriter<WallEjectEvent>,
) {
    if tick.show_message {
        messages.write(ClimbingModeMessage { entity });
    }
    if tick.wall_eject {
        ejects.write(WallEjectEvent {
            entity,
            away_from_wall: motor.contact().away_from_wall(),
        });
    }
}

/// Sync marker components with the motor state.
pub fn sync_state_markers(
    mut commands: Commands,
    q_climbers: Query<(
        Entity,
        &ClimbingMotor,
        Has<Climbing>,
        Has<Slipping>,
        Has<WallEjected>,
    )>,
) {
    for (entity, motor, has_climbing, has_slipping, has_ejected) in &q_climbers {
        // Sync Climbing
        if motor.is_climbing() && !has_climbing {
            commands.entity(entity).insert(Climbing);
        } else if !motor.is_climbing() && has_climbing {
            commands.entity(entity).remove::<Climbing>();
        }

        // Sync Slipping
        if motor.is_slipping() && !has_slipping {
            commands.entity(entity).insert(Slipping);
        } else if !motor.is_slipping() && has_slipping {
            commands.entity(entity).remove::<Slipping>();
        }

        // WallEjected only lives for the tick the eject happened
        if motor.wall_eject() {
            commands.entity(entity).insert(WallEjected {
                away_from_wall: motor.contact().away_from_wall(),
            });
        } else if has_ejected {
            commands.entity(entity).remove::<WallEjected>();
        }
    }
}
