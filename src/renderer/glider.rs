//! Falcon glider scene

use glam::Vec2;

use super::{Color, Paint, Surface};
use crate::consts::*;
use crate::sim::{GamePhase, GliderState, Obstacle, ObstacleKind, Player, Rect};

const SKY: Color = Color::hex(0x87CEEB);
const KHAKI: Color = Color::hex(0xF0E68C);
const WHEAT: Color = Color::hex(0xF5DEB3);
const SUN: Color = Color::hex(0xFFD700);
const SUN_GLOW: Color = Color::hex(0xFFA500);
const CLOUD: Color = Color::rgba(255, 255, 255, 0.8);
const GROUND_TOP: Color = Color::hex(0xD2691E);
const GROUND_BOTTOM: Color = Color::hex(0x8B4513);
const HATCH: Color = Color::hex(0xA0522D);
const CACTUS: Color = Color::hex(0x228B22);
const SPIKE: Color = Color::hex(0x32CD32);
const ROCK: Color = Color::hex(0x696969);
const ROCK_LIGHT: Color = Color::hex(0xA9A9A9);
const BODY: Color = Color::hex(0x8B4513);
const WING: Color = Color::hex(0x654321);
const HEAD: Color = Color::hex(0xA0522D);
const BEAK: Color = Color::hex(0xFFD700);
const HUD_TEXT: Color = Color::rgba(0x3B, 0x1F, 0x0B, 0.9);

/// Draw one frame. Reads state only.
pub fn draw(state: &GliderState, show_hud: bool, sun_glow: bool, surface: &mut dyn Surface) {
    surface.clear();

    let sky = Paint::vertical(0.0, CANVAS_HEIGHT, &[(0.0, SKY), (0.6, KHAKI), (1.0, WHEAT)]);
    surface.fill_rect(Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT), &sky);

    if sun_glow {
        surface.set_shadow(Some((SUN_GLOW, 20.0)));
    }
    surface.fill_circle(Vec2::new(CANVAS_WIDTH - 100.0, 100.0), 50.0, &SUN.into());
    if sun_glow {
        surface.set_shadow(None);
    }

    let cloud: Paint = CLOUD.into();
    for c in &state.clouds {
        surface.fill_circle(Vec2::new(c.x, c.y), c.size, &cloud);
        surface.fill_circle(Vec2::new(c.x - c.size * 0.5, c.y), c.size * 0.7, &cloud);
        surface.fill_circle(Vec2::new(c.x + c.size * 0.5, c.y), c.size * 0.7, &cloud);
    }

    draw_ground(state.tuning.ground_y(), surface);

    for obstacle in &state.obstacles {
        draw_obstacle(obstacle, surface);
    }

    draw_falcon(&state.player, surface);

    if show_hud && state.session.phase != GamePhase::Menu {
        surface.fill_text(
            &format!("Score {}", state.session.score),
            Vec2::new(16.0, 32.0),
            22.0,
            HUD_TEXT,
        );
        surface.fill_text(
            &format!("{} m", state.distance_meters()),
            Vec2::new(16.0, 60.0),
            22.0,
            HUD_TEXT,
        );
    }
}

fn draw_ground(ground_y: f32, surface: &mut dyn Surface) {
    let paint = Paint::vertical(ground_y, CANVAS_HEIGHT, &[(0.0, GROUND_TOP), (1.0, GROUND_BOTTOM)]);
    surface.fill_rect(
        Rect::new(0.0, ground_y, CANVAS_WIDTH, CANVAS_HEIGHT - ground_y),
        &paint,
    );

    let mut x = 0.0;
    while x < CANVAS_WIDTH {
        surface.stroke_line(
            Vec2::new(x, ground_y),
            Vec2::new(x + 10.0, CANVAS_HEIGHT),
            HATCH,
            2.0,
        );
        x += 20.0;
    }
}

fn draw_obstacle(obstacle: &Obstacle, surface: &mut dyn Surface) {
    let (x, y) = (obstacle.x, obstacle.y);
    match obstacle.kind {
        ObstacleKind::TallBarrier => {
            let body: Paint = CACTUS.into();
            surface.fill_rect(Rect::new(x + 10.0, y, 10.0, obstacle.height), &body);
            surface.fill_rect(Rect::new(x, y + 30.0, 30.0, 10.0), &body);
            surface.fill_rect(Rect::new(x + 5.0, y + 60.0, 20.0, 10.0), &body);

            let spike: Paint = SPIKE.into();
            for i in 0..5 {
                let i = i as f32;
                surface.fill_rect(Rect::new(x + 12.0 + i * 3.0, y + i * 20.0, 2.0, 8.0), &spike);
            }
        }
        ObstacleKind::WideBarrier => {
            let (w, h) = (obstacle.width, obstacle.height);
            surface.fill_ellipse(
                Vec2::new(x + w / 2.0, y + h / 2.0),
                Vec2::new(w / 2.0, h / 2.0),
                0.0,
                &ROCK.into(),
            );
            surface.fill_ellipse(
                Vec2::new(x + w / 3.0, y + h / 3.0),
                Vec2::new(w / 6.0, h / 6.0),
                0.0,
                &ROCK_LIGHT.into(),
            );
        }
    }
}

fn draw_falcon(player: &Player, surface: &mut dyn Surface) {
    let s = player.size;
    surface.save();
    surface.translate(Vec2::new(player.x + s / 2.0, player.y + s / 2.0));
    surface.rotate(player.rotation.to_radians());

    surface.fill_ellipse(Vec2::ZERO, Vec2::new(s / 2.0, s / 4.0), 0.0, &BODY.into());
    surface.fill_ellipse(Vec2::new(-5.0, -3.0), Vec2::new(s / 3.0, s / 6.0), -0.3, &WING.into());
    surface.fill_circle(Vec2::new(s / 3.0, 0.0), s / 6.0, &HEAD.into());
    surface.fill_polygon(
        &[
            Vec2::new(s / 2.0, 0.0),
            Vec2::new(s / 2.0 + 8.0, -2.0),
            Vec2::new(s / 2.0 + 8.0, 2.0),
        ],
        &BEAK.into(),
    );
    surface.fill_circle(Vec2::new(s / 3.0 + 3.0, -2.0), 2.0, &Color::BLACK.into());

    surface.restore();
}
