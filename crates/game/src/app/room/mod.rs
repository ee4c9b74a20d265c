mod animation;
mod dispatch;
mod layout;
mod notification;
mod puzzles;
mod registry;
mod scene_impl;
mod session;
mod victory;
mod viewpoint;

use room_engine::Scene;

use self::scene_impl::RoomScene;
use self::victory::{VictoryHandle, VictoryScene};

pub(crate) use self::session::ROOM_TITLE;
pub(crate) use self::viewpoint::RoomTuning;

/// Seed for the decorative scatter and the dust field.
pub(crate) const ROOM_SEED: u64 = 0x0DAE_DA10;

pub(crate) fn build_scene_pair(tuning: RoomTuning, seed: u64) -> (Box<dyn Scene>, Box<dyn Scene>) {
    let victory = VictoryHandle::default();
    let room = RoomScene::new(tuning, seed, victory.clone());
    (Box::new(room), Box::new(VictoryScene::new(victory)))
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
