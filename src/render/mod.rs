pub mod animation;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use crate::battle::{BattleAction, BattleEngine, BattlePhase};
use crate::creature::{Creature, progression};
use crate::data::TypeChart;
use crate::map::TileMap;
use crate::movement::MovementController;

const HUD_WIDTH: i32 = 34;
const HP_BAR_WIDTH: i32 = 20;

pub fn draw_map(ctx: &mut BTerm, map: &TileMap, origin: Point, reserved_rows: i32) {
    let (screen_w, screen_h) = ctx.get_char_size();
    let max_draw_y = screen_h as i32 - reserved_rows;
    let max_draw_x = screen_w as i32 - 2;

    for y in 0..map.height {
        let screen_y = origin.y + y;
        if screen_y >= max_draw_y {
            break;
        }
        for x in 0..map.width {
            let screen_x = origin.x + x;
            if screen_x >= max_draw_x {
                break;
            }
            if let Some(tile) = map.tile_at(Point::new(x, y)) {
                ctx.set(screen_x, screen_y, tile.fg, tile.bg, tile.glyph);
            }
        }
    }
}

/// Places `glyph` on the cell nearest to the mover's pixel position, so an
/// interpolated step shows up on the terminal grid as soon as it is halfway.
pub fn draw_actor(ctx: &mut BTerm, origin: Point, mover: &MovementController, glyph: u16, fg: RGB) {
    let pixel = mover.pixel();
    let size = mover.tile_size().max(1.0);
    let cell = Point::new(
        (pixel.x / size).round() as i32,
        (pixel.y / size).round() as i32,
    );
    ctx.set(origin.x + cell.x, origin.y + cell.y, fg, RGB::named(BLACK), glyph);
}

/// Green, then yellow under half health, then red under a fifth.
pub fn hp_color(ratio: f32) -> RGB {
    if ratio < 0.2 {
        RGB::named(RED)
    } else if ratio < 0.5 {
        RGB::named(YELLOW)
    } else {
        RGB::named(GREEN)
    }
}

/// Experience gathered inside the current level, and the span of that level.
pub fn exp_progress(creature: &Creature) -> (u32, u32) {
    let floor = progression::experience_for_level(creature.level());
    let gained = creature.experience().saturating_sub(floor);
    let span = gained + creature.experience_to_next_level();
    (gained, span.max(1))
}

/// Short hint for a type multiplier; neutral matchups get none.
pub fn effectiveness_label(multiplier: f32) -> &'static str {
    if multiplier == 0.0 {
        "no effect"
    } else if multiplier > 1.0 {
        "super effective"
    } else if multiplier < 1.0 {
        "not very effective"
    } else {
        ""
    }
}

pub fn draw_battle(ctx: &mut BTerm, engine: &BattleEngine, chart: &TypeChart) {
    let (width, height) = ctx.get_char_size();
    let width = width as i32;
    let height = height as i32;

    draw_creature_hud(ctx, Point::new(2, 2), engine.opponent(), false);
    draw_creature_hud(ctx, Point::new(width - HUD_WIDTH - 2, 16), engine.player(), true);

    let sprite_fg = RGB::from_u8(255, 107, 53);
    ctx.print_color(width - 16, 6, sprite_fg, RGB::named(BLACK), "(o_o)");
    ctx.print_color(10, 20, RGB::from_u8(135, 206, 235), RGB::named(BLACK), "(^_^)");

    let box_top = height - 12;
    ctx.draw_box(
        0,
        box_top,
        width - 1,
        11,
        RGB::named(GRAY),
        RGB::from_u8(44, 44, 84),
    );
    ctx.print_color(
        2,
        box_top + 2,
        RGB::named(WHITE),
        RGB::from_u8(44, 44, 84),
        engine.message(),
    );

    match engine.phase() {
        BattlePhase::SelectingAction => {
            for (row, action) in BattleAction::ALL.iter().enumerate() {
                let selected = *action == engine.selected_action();
                let (marker, fg) = if selected {
                    ('>', RGB::named(YELLOW))
                } else {
                    (' ', RGB::named(WHITE))
                };
                ctx.print_color(
                    4,
                    box_top + 4 + row as i32,
                    fg,
                    RGB::from_u8(44, 44, 84),
                    format!("{marker} {}", action.label()),
                );
            }
            draw_known_moves(ctx, Point::new(width / 2, box_top + 4), engine, chart);
        }
        BattlePhase::Victory | BattlePhase::Defeat => {
            ctx.print_color(
                4,
                box_top + 4,
                RGB::named(YELLOW),
                RGB::from_u8(44, 44, 84),
                "[Confirm] continue",
            );
        }
        _ => {}
    }
}

fn draw_known_moves(ctx: &mut BTerm, at: Point, engine: &BattleEngine, chart: &TypeChart) {
    let bg = RGB::from_u8(44, 44, 84);
    let defender = engine.opponent().species().kind;
    for (row, mv) in engine.player().moves().iter().enumerate() {
        let hint = effectiveness_label(chart.multiplier(defender, mv.kind));
        ctx.print_color(
            at.x,
            at.y + row as i32,
            RGB::named(LIGHT_GRAY),
            bg,
            format!("{:<14}{:>3}  {hint}", mv.name, mv.power),
        );
    }
}

fn draw_creature_hud(ctx: &mut BTerm, at: Point, creature: &Creature, is_player: bool) {
    let rows = if is_player { 6 } else { 4 };
    ctx.draw_box(at.x, at.y, HUD_WIDTH, rows, RGB::named(BLACK), RGB::from_u8(44, 44, 84));
    let bg = RGB::from_u8(44, 44, 84);
    ctx.print_color(at.x + 2, at.y + 1, RGB::named(WHITE), bg, creature.name());
    let level_fg = if is_player {
        RGB::from_u8(255, 68, 68)
    } else {
        RGB::named(WHITE)
    };
    ctx.print_color(
        at.x + HUD_WIDTH - 8,
        at.y + 1,
        level_fg,
        bg,
        format!("Lv.{}", creature.level()),
    );

    let max = creature.stats().max_health;
    let ratio = if max == 0 {
        0.0
    } else {
        creature.health() as f32 / max as f32
    };
    ctx.print_color(at.x + 2, at.y + 2, RGB::named(GOLD), bg, "HP");
    ctx.draw_bar_horizontal(
        at.x + 5,
        at.y + 2,
        HP_BAR_WIDTH,
        creature.health() as i32,
        max.max(1) as i32,
        hp_color(ratio),
        RGB::named(BLACK),
    );
    if is_player {
        ctx.print_color(
            at.x + 6 + HP_BAR_WIDTH,
            at.y + 2,
            RGB::named(WHITE),
            bg,
            format!("{}/{}", creature.health(), max),
        );
        let (gained, span) = exp_progress(creature);
        ctx.print_color(at.x + 2, at.y + 4, RGB::named(GOLD), bg, "EXP");
        ctx.draw_bar_horizontal(
            at.x + 6,
            at.y + 4,
            HP_BAR_WIDTH - 1,
            gained as i32,
            span as i32,
            RGB::from_u8(0, 128, 255),
            RGB::named(BLACK),
        );
    }
}
