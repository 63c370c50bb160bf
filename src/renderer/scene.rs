//! Session → draw list.

use glam::{Vec3, vec3};

use super::{DrawCall, Rgba, TopDownCamera};
use crate::sim::{EntityView, Kind, Phase, Readout, Session};

const BUILDING_LOW: u32 = 0x50;
const BUILDING_HIGH: u32 = 0xD0;
const FUEL: Rgba = 0x00_30_C0_40;
const BONUS: Rgba = 0x00_F0_D0_20;
const LAUNCHER: Rgba = 0x00_B0_20_20;
const MISSILE: Rgba = 0x00_FF_80_00;
pub const PLAYER: Rgba = 0x00_F0_F0_F0;
const HEADING: Rgba = 0x00_20_60_FF;

const BAR_W: i32 = 160;
const BAR_H: i32 = 10;
const BAR_BACK: Rgba = 0x00_40_40_40;
const HEALTH_BAR: Rgba = 0x00_D0_30_30;
const FUEL_BAR: Rgba = 0x00_30_70_E0;
const SCORE_PIP: i32 = 6;
const MAX_PIPS: u32 = 24;

/// Build the whole frame back-to-front: buildings, street entities, the
/// car, then the HUD.
pub fn compose(session: &Session, camera: &TopDownCamera, width: usize, height: usize) -> Vec<DrawCall> {
    let mut out = Vec::with_capacity(session.city().index.len() + 32);
    buildings(&mut out, session, camera, width, height);
    for e in session.entities().iter().filter(|e| !e.consumed) {
        out.push(entity(e, camera, width, height));
    }
    player(&mut out, session, camera, width, height);
    hud(&mut out, session, width, height);
    out
}

/// Grey level scaled by roof height; taller is lighter.
pub fn building_shade(height: f32, tallest: f32) -> Rgba {
    let t = if tallest > 0.0 {
        (height / tallest).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let g = BUILDING_LOW + ((BUILDING_HIGH - BUILDING_LOW) as f32 * t) as u32;
    (g << 16) | (g << 8) | g
}

fn buildings(
    out: &mut Vec<DrawCall>,
    session: &Session,
    camera: &TopDownCamera,
    width: usize,
    height: usize,
) {
    let volumes = session.city().index.volumes();
    let tallest = volumes.iter().map(|v| v.aabb.max.y).fold(0.0, f32::max);

    for v in volumes {
        let (x0, y0) = camera.world_to_screen(v.aabb.min, width, height);
        let (x1, y1) = camera.world_to_screen(v.aabb.max, width, height);
        if x1 < 0 || y1 < 0 || x0 >= width as i32 || y0 >= height as i32 {
            continue;
        }
        out.push(DrawCall::Rect {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
            colour: building_shade(v.aabb.max.y, tallest),
        });
    }
}

fn entity(e: &EntityView, camera: &TopDownCamera, width: usize, height: usize) -> DrawCall {
    let (cx, cy) = camera.world_to_screen(e.position, width, height);
    let colour = match e.kind {
        Kind::Fuel => FUEL,
        Kind::Bonus => BONUS,
        Kind::Launcher => LAUNCHER,
        Kind::Missile => MISSILE,
    };
    DrawCall::Disc {
        cx,
        cy,
        r: camera.scale(e.radius),
        colour,
    }
}

fn player(
    out: &mut Vec<DrawCall>,
    session: &Session,
    camera: &TopDownCamera,
    width: usize,
    height: usize,
) {
    let p = session.player();
    let pos = p.body.position();
    let (cx, cy) = camera.world_to_screen(pos, width, height);
    out.push(DrawCall::Disc {
        cx,
        cy,
        r: camera.scale(p.body.radius()),
        colour: PLAYER,
    });
    let nose: Vec3 = pos + p.forward() * p.body.radius();
    let (nx, ny) = camera.world_to_screen(nose, width, height);
    out.push(DrawCall::Line {
        x0: cx,
        y0: cy,
        x1: nx,
        y1: ny,
        colour: HEADING,
    });
}

fn bar(out: &mut Vec<DrawCall>, y: i32, gauge: &dyn Readout, colour: Rgba) {
    out.push(DrawCall::Rect {
        x: 8,
        y,
        w: BAR_W,
        h: BAR_H,
        colour: BAR_BACK,
    });
    let filled = (gauge.fraction().unwrap_or(0.0) * BAR_W as f32).round() as i32;
    if filled > 0 {
        out.push(DrawCall::Rect {
            x: 8,
            y,
            w: filled,
            h: BAR_H,
            colour,
        });
    }
}

fn hud(out: &mut Vec<DrawCall>, session: &Session, width: usize, height: usize) {
    bar(out, 8, session.health(), HEALTH_BAR);
    bar(out, 8 + BAR_H + 4, session.fuel(), FUEL_BAR);

    // one pip per bonus collected
    let per_pip = session.config().gameplay.bonus_score.max(1);
    let pips = (session.score().value() as u32 / per_pip).min(MAX_PIPS);
    for i in 0..pips as i32 {
        out.push(DrawCall::Rect {
            x: 8 + i * (SCORE_PIP + 2),
            y: 8 + 2 * (BAR_H + 4),
            w: SCORE_PIP,
            h: SCORE_PIP,
            colour: BONUS,
        });
    }

    let frame = match session.phase() {
        Phase::Running => return,
        Phase::Wrecked => HEALTH_BAR,
        Phase::Stranded => FUEL_BAR,
    };
    let (w, h) = (width as i32, height as i32);
    for (x0, y0, x1, y1) in [(0, 0, w - 1, 0), (0, h - 1, w - 1, h - 1), (0, 0, 0, h - 1), (w - 1, 0, w - 1, h - 1)] {
        out.push(DrawCall::Line {
            x0,
            y0,
            x1,
            y1,
            colour: frame,
        });
    }
}

/// Where the viewer should aim the camera for this session.
#[inline]
pub fn focus(session: &Session) -> Vec3 {
    let p = session.player().body.position();
    vec3(p.x, 0.0, p.z)
}
