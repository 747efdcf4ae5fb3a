//! Date catcher scene: desert sky, sun, palm, falling dates, woven basket

use glam::Vec2;

use super::{Color, Paint, Surface};
use crate::consts::*;
use crate::sim::{CatcherState, GamePhase, Rect};

const SKY: Color = Color::hex(0x87CEEB);
const WHEAT: Color = Color::hex(0xF5DEB3);
const SAND: Color = Color::hex(0xD2691E);
const SUN: Color = Color::hex(0xFFD700);
const PALM: Color = Color::rgba(0x22, 0x8B, 0x22, 0.42);
const SHINE: Color = Color::rgba(255, 255, 255, 0.3);
const BASKET_TOP: Color = Color::hex(0xD2691E);
const BASKET_BOTTOM: Color = Color::hex(0x8B4513);
const WEAVE: Color = Color::hex(0x654321);
const HUD_TEXT: Color = Color::rgba(0x3B, 0x1F, 0x0B, 0.9);

/// Draw one frame. Reads state only.
pub fn draw(state: &CatcherState, show_hud: bool, surface: &mut dyn Surface) {
    surface.clear();
    draw_background(surface);

    for item in &state.items {
        let half = item.size / 2.0;
        let (r, g, b) = item.color.rgb();
        surface.fill_ellipse(
            Vec2::new(item.x + half, item.y + half),
            Vec2::new(half, item.size / 1.5),
            0.0,
            &Color::rgb(r, g, b).into(),
        );
        surface.fill_ellipse(
            Vec2::new(item.x + item.size / 3.0, item.y + item.size / 3.0),
            Vec2::new(item.size / 4.0, item.size / 6.0),
            0.0,
            &SHINE.into(),
        );
    }

    draw_basket(state, surface);

    if show_hud && state.session.phase != GamePhase::Menu {
        surface.fill_text(
            &format!("Score {}", state.session.score),
            Vec2::new(16.0, 32.0),
            22.0,
            HUD_TEXT,
        );
        surface.fill_text(
            &format!("Time {}s", state.time_left),
            Vec2::new(16.0, 60.0),
            22.0,
            HUD_TEXT,
        );
    }
}

fn draw_background(surface: &mut dyn Surface) {
    let sky = Paint::vertical(0.0, CANVAS_HEIGHT, &[(0.0, SKY), (0.7, WHEAT), (1.0, SAND)]);
    surface.fill_rect(Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT), &sky);

    surface.fill_circle(Vec2::new(CANVAS_WIDTH - 80.0, 80.0), 40.0, &SUN.into());

    let palm: Paint = PALM.into();
    surface.fill_rect(
        Rect::new(CANVAS_WIDTH - 150.0, CANVAS_HEIGHT - 200.0, 20.0, 150.0),
        &palm,
    );
    surface.fill_circle(
        Vec2::new(CANVAS_WIDTH - 140.0, CANVAS_HEIGHT - 190.0),
        40.0,
        &palm,
    );
}

fn draw_basket(state: &CatcherState, surface: &mut dyn Surface) {
    let bounds = state.collector.bounds();
    let paint = Paint::Linear {
        from: Vec2::new(bounds.x, bounds.y),
        to: Vec2::new(bounds.x, bounds.bottom()),
        stops: vec![(0.0, BASKET_TOP), (1.0, BASKET_BOTTOM)],
    };
    surface.fill_rect(bounds, &paint);

    for i in 0..5 {
        let x = bounds.x + i as f32 * bounds.w / 4.0;
        surface.stroke_line(
            Vec2::new(x, bounds.y),
            Vec2::new(x, bounds.bottom()),
            WEAVE,
            2.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use crate::sim::{FallingItem, ItemColor};
    use crate::tuning::CatcherTuning;

    #[test]
    fn test_menu_draws_scene_without_hud() {
        let state = CatcherState::new(CatcherTuning::default());
        let mut surface = RecordingSurface::new();
        draw(&state, true, &mut surface);
        assert_eq!(surface.commands[0], DrawCommand::Clear);
        assert!(surface.texts().is_empty());
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Line { .. })), 5);
    }

    #[test]
    fn test_items_and_hud_drawn_while_playing() {
        let mut state = CatcherState::new(CatcherTuning::default());
        state.start();
        state.items.push(FallingItem {
            x: 100.0,
            y: 100.0,
            speed: 3.0,
            size: 20.0,
            color: ItemColor::Sienna,
        });
        let mut surface = RecordingSurface::new();
        draw(&state, true, &mut surface);
        assert_eq!(surface.texts(), vec!["Score 0", "Time 60s"]);
        // sun + palm crown + (date + shine)
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Ellipse { .. })), 4);

        let mut quiet = RecordingSurface::new();
        draw(&state, false, &mut quiet);
        assert!(quiet.texts().is_empty());
    }
}
