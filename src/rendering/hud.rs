//! HUD
//!
//! egui overlays drawn over the session: the player's pools and buffs, the
//! skill bar with cooldowns, score and combo, enemy health bars, and
//! floating damage numbers projected from world space.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::camera::MainCamera;
use crate::combat::events::{DamageEvent, PlayerDamagedEvent};
use crate::keybindings::{GameAction, Keybindings};
use crate::settings::GameSettings;
use crate::states::session::components::{
    Enemy, PlayerState, ScoreBoard, SessionClock, SessionEntity,
};
use crate::states::session::lifecycle::FpsSampler;
use crate::states::session::modifiers::ModifierStack;
use crate::states::session::skills::SkillBar;
use crate::states::session::systems::FramePhase;
use crate::states::GameState;

/// Seconds a damage number stays on screen
const FLOATING_TEXT_LIFETIME: f32 = 1.2;

/// Units per second a damage number rises
const FLOATING_TEXT_RISE: f32 = 1.5;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                spawn_floating_damage_text,
                update_floating_damage_text,
                render_floating_damage_text,
                render_enemy_health_bars,
                render_player_hud,
            )
                .chain()
                .after(FramePhase::Resolution)
                .run_if(in_state(GameState::Playing))
                .run_if(resource_exists::<SessionClock>),
        );
    }
}

/// A damage number floating up from where a hit landed
#[derive(Component, Debug, Clone)]
pub struct FloatingDamageText {
    pub world_position: Vec3,
    pub text: String,
    pub color: egui::Color32,
    pub is_crit: bool,
    /// Seconds until removal
    pub lifetime: f32,
}

fn spawn_floating_damage_text(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut taken_events: EventReader<PlayerDamagedEvent>,
) {
    for event in damage_events.read() {
        let color = if event.is_critical {
            egui::Color32::from_rgb(255, 90, 60)
        } else if event.is_skill_sourced() {
            egui::Color32::from_rgb(120, 200, 255)
        } else {
            egui::Color32::from_rgb(255, 235, 160)
        };
        commands.spawn((
            FloatingDamageText {
                world_position: event.world_position + Vec3::Y * 2.5,
                text: format!("{:.0}", event.amount),
                color,
                is_crit: event.is_critical,
                lifetime: FLOATING_TEXT_LIFETIME,
            },
            SessionEntity,
        ));
    }

    for event in taken_events.read() {
        let text = if event.amount <= 0.0 && event.absorbed > 0.0 {
            format!("{:.0} absorbed", event.absorbed)
        } else {
            format!("-{:.0}", event.amount)
        };
        commands.spawn((
            FloatingDamageText {
                world_position: event.world_position + Vec3::Y * 2.5,
                text,
                color: egui::Color32::from_rgb(230, 60, 60),
                is_crit: false,
                lifetime: FLOATING_TEXT_LIFETIME,
            },
            SessionEntity,
        ));
    }
}

/// Rise, age, and despawn expired numbers
fn update_floating_damage_text(
    mut commands: Commands,
    time: Res<Time>,
    mut texts: Query<(Entity, &mut FloatingDamageText)>,
) {
    let dt = time.delta_secs();
    for (entity, mut text) in texts.iter_mut() {
        text.world_position.y += FLOATING_TEXT_RISE * dt;
        text.lifetime -= dt;
        if text.lifetime <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

fn render_floating_damage_text(
    mut contexts: EguiContexts,
    settings: Res<GameSettings>,
    texts: Query<&FloatingDamageText>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) {
    if !settings.show_damage_numbers {
        return;
    }
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };

    egui::Area::new(egui::Id::new("floating_damage_text"))
        .fixed_pos(egui::pos2(0.0, 0.0))
        .show(ctx, |ui| {
            for text in texts.iter().filter(|t| t.lifetime > 0.0) {
                let Ok(screen_pos) = camera.world_to_viewport(camera_transform, text.world_position)
                else {
                    continue;
                };

                // Fade out over the last half second
                let alpha = ((text.lifetime / 0.5).min(1.0) * 255.0) as u8;
                let color = egui::Color32::from_rgba_unmultiplied(
                    text.color.r(),
                    text.color.g(),
                    text.color.b(),
                    alpha,
                );
                let outline = egui::Color32::from_rgba_unmultiplied(0, 0, 0, alpha);
                let (label, size) = if text.is_crit {
                    (format!("{}!", text.text), 30.0)
                } else {
                    (text.text.clone(), 22.0)
                };
                let font = egui::FontId::proportional(size);
                let at = egui::pos2(screen_pos.x, screen_pos.y);

                for (dx, dy) in [(-1.5, 0.0), (1.5, 0.0), (0.0, -1.5), (0.0, 1.5)] {
                    ui.painter().text(
                        at + egui::vec2(dx, dy),
                        egui::Align2::CENTER_CENTER,
                        &label,
                        font.clone(),
                        outline,
                    );
                }
                ui.painter()
                    .text(at, egui::Align2::CENTER_CENTER, &label, font, color);
            }
        });
}

/// Health bars above every living enemy; bosses also show their name.
fn render_enemy_health_bars(
    mut contexts: EguiContexts,
    settings: Res<GameSettings>,
    enemies: Query<&Enemy>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) {
    if !settings.show_hud {
        return;
    }
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };

    egui::Area::new(egui::Id::new("enemy_health_bars"))
        .fixed_pos(egui::pos2(0.0, 0.0))
        .show(ctx, |ui| {
            for enemy in enemies.iter().filter(|e| !e.is_dead()) {
                let is_boss = enemy.config.is_boss();
                let world_pos = enemy.position + Vec3::Y * if is_boss { 3.5 } else { 2.5 };
                let Ok(screen_pos) = camera.world_to_viewport(camera_transform, world_pos) else {
                    continue;
                };

                let fraction = (enemy.health_percent() / 100.0).clamp(0.0, 1.0);
                let bar_width = if is_boss { 90.0 } else { 50.0 };
                let bar_height = 6.0;
                let bar_pos = egui::pos2(screen_pos.x - bar_width / 2.0, screen_pos.y);
                let rect = egui::Rect::from_min_size(bar_pos, egui::vec2(bar_width, bar_height));

                ui.painter()
                    .rect_filled(rect, 2.0, egui::Color32::from_rgb(30, 30, 30));
                ui.painter().rect_filled(
                    egui::Rect::from_min_size(bar_pos, egui::vec2(bar_width * fraction, bar_height)),
                    2.0,
                    if is_boss {
                        egui::Color32::from_rgb(200, 40, 40)
                    } else {
                        egui::Color32::from_rgb(200, 120, 40)
                    },
                );
                ui.painter().rect_stroke(
                    rect,
                    2.0,
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(200, 200, 200)),
                );

                if is_boss {
                    ui.painter().text(
                        egui::pos2(screen_pos.x, screen_pos.y - 10.0),
                        egui::Align2::CENTER_CENTER,
                        format!("{} (phase {})", enemy.config.name, enemy.phase + 1),
                        egui::FontId::proportional(14.0),
                        egui::Color32::from_rgb(240, 210, 160),
                    );
                }
            }
        });
}

#[allow(clippy::too_many_arguments)]
fn render_player_hud(
    mut contexts: EguiContexts,
    settings: Res<GameSettings>,
    keybindings: Res<Keybindings>,
    bar: Res<SkillBar>,
    score: Res<ScoreBoard>,
    fps: Res<FpsSampler>,
    clock: Res<SessionClock>,
    players: Query<(&PlayerState, &ModifierStack)>,
) {
    if !settings.show_hud {
        return;
    }
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let Ok((player, modifiers)) = players.get_single() else {
        return;
    };

    egui::Window::new("status")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .show(ctx, |ui| {
            ui.set_width(240.0);
            pool_bar(
                ui,
                "Health",
                player.health,
                player.max_health,
                egui::Color32::from_rgb(190, 40, 40),
            );
            pool_bar(
                ui,
                "Energy",
                player.energy,
                player.max_energy,
                egui::Color32::from_rgb(60, 120, 220),
            );

            for modifier in &modifiers.modifiers {
                ui.label(
                    egui::RichText::new(format!(
                        "{}: {} ({:.0}s)",
                        modifier.source,
                        modifier.kind.describe(modifier.value),
                        modifier.remaining
                    ))
                    .size(13.0)
                    .color(egui::Color32::from_rgb(170, 220, 170)),
                );
            }
        });

    egui::Window::new("score")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("Score {}", score.score)).size(22.0));
            if score.combo > 1 {
                ui.label(
                    egui::RichText::new(format!("{} hit combo", score.combo))
                        .size(18.0)
                        .color(egui::Color32::from_rgb(255, 200, 80)),
                );
            }
            ui.label(format!("Kills {}", score.kills));
            ui.label(format!("{:.0}s", clock.elapsed));
            ui.label(
                egui::RichText::new(format!("{:.0} fps", fps.fps))
                    .size(12.0)
                    .color(egui::Color32::GRAY),
            );
        });

    egui::Window::new("skills")
        .title_bar(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -12.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (slot, skill) in bar.iter() {
                    let key = GameAction::skill_slot(slot)
                        .map(|action| keybindings.binding_display(action))
                        .unwrap_or_default();
                    ui.vertical(|ui| {
                        ui.set_width(110.0);
                        match skill {
                            Some(skill) => {
                                let affordable = player.energy >= skill.config.energy_cost;
                                let color = if skill.is_ready() && affordable {
                                    egui::Color32::from_rgb(230, 217, 191)
                                } else {
                                    egui::Color32::from_rgb(120, 120, 120)
                                };
                                ui.label(egui::RichText::new(&skill.config.name).size(16.0).color(color));
                                if skill.is_ready() {
                                    ui.label(format!("[{}] {:.0} energy", key, skill.config.energy_cost));
                                } else {
                                    ui.label(format!("[{}] {:.1}s", key, skill.cooldown_secs()));
                                }
                            }
                            None => {
                                ui.label(egui::RichText::new("empty").color(egui::Color32::DARK_GRAY));
                                ui.label(format!("[{}]", key));
                            }
                        }
                    });
                }
            });
        });
}

fn pool_bar(ui: &mut egui::Ui, label: &str, current: f32, max: f32, color: egui::Color32) {
    let fraction = if max > 0.0 { (current / max).clamp(0.0, 1.0) } else { 0.0 };
    ui.add(
        egui::ProgressBar::new(fraction)
            .fill(color)
            .text(format!("{} {:.0} / {:.0}", label, current, max)),
    );
}
