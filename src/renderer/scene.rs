//! Scene painter: records one frame of the game into a [`DrawList`]
//!
//! Layers are painted strictly back to front; there is no depth test, so
//! the order in [`Layer::ORDER`] is what the player sees.

use glam::Vec2;

use super::draw_list::{ColorFilter, DrawList, TextBaseline};
use super::font;
use super::vertex::{Color, colors};
use crate::assets::{AssetCache, AssetKey};
use crate::sim::{
    AirPump, Balloon, Bird, Cloud, Game, Particle, Raindrop, ScorePopup, SpecialKind, Star,
    SunRay, WeatherKind, WeatherManager,
};
use crate::ui::{self, BackButton, GameOverLayout};
use crate::{Bounds, Rect};

/// Center of the sun and moon, measured from the top-right corner
const CELESTIAL_INSET: Vec2 = Vec2::new(100.0, 80.0);
const SUN_RADIUS: f32 = 40.0;
const MOON_RADIUS: f32 = 35.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Sky,
    Stars,
    Clouds,
    Weather,
    Birds,
    Balloons,
    Particles,
    Popups,
    Pump,
    Chrome,
    GameOver,
}

impl Layer {
    /// Back to front
    pub const ORDER: [Layer; 11] = [
        Layer::Sky,
        Layer::Stars,
        Layer::Clouds,
        Layer::Weather,
        Layer::Birds,
        Layer::Balloons,
        Layer::Particles,
        Layer::Popups,
        Layer::Pump,
        Layer::Chrome,
        Layer::GameOver,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Layer::Sky => "sky",
            Layer::Stars => "stars",
            Layer::Clouds => "clouds",
            Layer::Weather => "weather",
            Layer::Birds => "birds",
            Layer::Balloons => "balloons",
            Layer::Particles => "particles",
            Layer::Popups => "popups",
            Layer::Pump => "pump",
            Layer::Chrome => "chrome",
            Layer::GameOver => "game_over",
        }
    }
}

/// Per-frame values shared by every draw call
pub struct PaintCtx<'a> {
    pub assets: &'a AssetCache,
    /// Host clock, drives twinkles and pulses
    pub time_ms: f64,
    pub bounds: Bounds,
    pub night_intensity: f32,
}

impl PaintCtx<'_> {
    fn celestial_center(&self) -> Vec2 {
        Vec2::new(self.bounds.width - CELESTIAL_INSET.x, CELESTIAL_INSET.y)
    }
}

/// Something that can paint itself
pub trait Draw {
    fn draw(&self, list: &mut DrawList, cx: &PaintCtx<'_>);
}

/// Record the whole frame
pub fn paint(game: &Game, assets: &AssetCache, time_ms: f64) -> DrawList {
    let cx = PaintCtx {
        assets,
        time_ms,
        bounds: game.bounds(),
        night_intensity: game.weather().night_intensity(),
    };
    let mut list = DrawList::new();

    for layer in Layer::ORDER {
        if layer == Layer::GameOver && !game.is_game_over() {
            continue;
        }
        list.begin_layer(layer.name());
        paint_layer(&mut list, layer, game, &cx);
    }

    list
}

fn paint_layer(list: &mut DrawList, layer: Layer, game: &Game, cx: &PaintCtx<'_>) {
    match layer {
        Layer::Sky => {
            let sky = game.weather().sky_colors();
            let full = Rect::new(0.0, 0.0, cx.bounds.width, cx.bounds.height);
            list.fill_rect_gradient(full, colors::rgb(sky.top), colors::rgb(sky.bottom));
        }
        Layer::Stars => {
            if cx.night_intensity > 0.0 {
                draw_all(list, cx, &game.weather().stars);
            }
        }
        Layer::Clouds => draw_all(list, cx, game.clouds()),
        Layer::Weather => paint_weather(list, game.weather(), cx),
        Layer::Birds => {
            if game.birds_frozen() {
                list.save();
                list.set_filter(ColorFilter::Frozen);
                draw_all(list, cx, game.birds());
                list.restore();
                paint_freeze_indicator(list, game.freeze_remaining_ms(), cx);
            } else {
                draw_all(list, cx, game.birds());
            }
        }
        Layer::Balloons => draw_all(list, cx, game.balloons()),
        Layer::Particles => draw_all(list, cx, game.particles()),
        Layer::Popups => draw_all(list, cx, game.popups()),
        Layer::Pump => paint_pump(list, game, cx),
        Layer::Chrome => game.back_button().draw(list, cx),
        Layer::GameOver => paint_game_over(list, game, cx),
    }
}

fn draw_all<T: Draw>(list: &mut DrawList, cx: &PaintCtx<'_>, items: &[T]) {
    for item in items {
        item.draw(list, cx);
    }
}

// --- Scenery ---

impl Draw for Cloud {
    fn draw(&self, list: &mut DrawList, _cx: &PaintCtx<'_>) {
        const PUFFS: [(Vec2, f32); 5] = [
            (Vec2::new(0.0, 0.0), 40.0),
            (Vec2::new(50.0, -10.0), 50.0),
            (Vec2::new(100.0, 0.0), 40.0),
            (Vec2::new(30.0, 20.0), 30.0),
            (Vec2::new(70.0, 20.0), 35.0),
        ];
        list.save();
        list.translate(self.pos);
        list.scale(self.scale);
        for (offset, radius) in PUFFS {
            list.fill_circle(offset + Vec2::new(0.0, 5.0), radius, colors::CLOUD_SHADOW);
        }
        for (offset, radius) in PUFFS {
            list.fill_circle(offset, radius, colors::CLOUD);
        }
        list.restore();
    }
}

impl Draw for Bird {
    fn draw(&self, list: &mut DrawList, _cx: &PaintCtx<'_>) {
        let s = self.size;
        let body = colors::rgb(self.color);
        let wing = self.wing_offset();

        list.save();
        list.translate(self.pos);

        list.fill_ellipse(Vec2::ZERO, s * 0.6, s * 0.4, 0.0, body);
        list.fill_circle(Vec2::new(s * 0.4, -s * 0.2), s * 0.35, body);
        list.fill_polygon(
            &[
                Vec2::new(s * 0.6, -s * 0.2),
                Vec2::new(s * 0.9, -s * 0.15),
                Vec2::new(s * 0.6, -s * 0.1),
            ],
            colors::BEAK,
        );
        list.fill_circle(Vec2::new(s * 0.5, -s * 0.25), 3.0, colors::BLACK);

        list.set_alpha(0.8);
        list.fill_ellipse(Vec2::new(-s * 0.3, wing), s * 0.5, s * 0.3, -0.3, body);
        list.fill_ellipse(Vec2::new(-s * 0.3, -wing), s * 0.5, s * 0.3, 0.3, body);

        list.restore();
    }
}

impl Draw for Star {
    fn draw(&self, list: &mut DrawList, cx: &PaintCtx<'_>) {
        let alpha = self.alpha(cx.time_ms, cx.night_intensity);
        list.fill_circle(self.pos, self.size, colors::rgba(colors::STAR, alpha));
        if self.size > 1.5 {
            list.fill_circle(
                self.pos,
                self.size * 2.0,
                colors::rgba(colors::STAR_GLOW, alpha * 0.3),
            );
        }
    }
}

impl Draw for SunRay {
    fn draw(&self, list: &mut DrawList, cx: &PaintCtx<'_>) {
        let center = cx.celestial_center();
        let dir = Vec2::from_angle(self.angle);
        let length = self.current_length(cx.time_ms);
        list.stroke_line(
            center + dir * SUN_RADIUS,
            center + dir * (SUN_RADIUS + length),
            3.0,
            colors::SUN_RAY,
        );
    }
}

impl Draw for Raindrop {
    fn draw(&self, list: &mut DrawList, _cx: &PaintCtx<'_>) {
        list.stroke_line(self.pos, self.pos + Vec2::new(0.0, self.length), 2.0, colors::RAIN);
    }
}

fn paint_weather(list: &mut DrawList, weather: &WeatherManager, cx: &PaintCtx<'_>) {
    let center = cx.celestial_center();

    if weather.kind == WeatherKind::Sunny && weather.is_daytime() {
        draw_all(list, cx, &weather.sun_rays);
        list.fill_radial_gradient(
            center,
            center,
            SUN_RADIUS,
            &[(0.0, colors::SUN[0]), (0.5, colors::SUN[1]), (1.0, colors::SUN[2])],
        );
    }

    if weather.is_nighttime() {
        list.fill_radial_gradient(
            center - Vec2::splat(10.0),
            center,
            MOON_RADIUS,
            &[(0.0, colors::MOON[0]), (0.5, colors::MOON[1]), (1.0, colors::MOON[2])],
        );
        for (offset, radius) in [
            (Vec2::new(-10.0, -5.0), 8.0),
            (Vec2::new(8.0, 10.0), 5.0),
            (Vec2::new(5.0, -12.0), 6.0),
        ] {
            list.fill_circle(center + offset, radius, colors::MOON_CRATER);
        }
    }

    let full = Rect::new(0.0, 0.0, cx.bounds.width, cx.bounds.height);
    match weather.kind {
        WeatherKind::Rainy => {
            draw_all(list, cx, &weather.raindrops);
            list.fill_rect(full, colors::RAIN_OVERLAY);
        }
        WeatherKind::Cloudy => list.fill_rect(full, colors::CLOUD_OVERLAY),
        WeatherKind::Sunny => {}
    }
}

fn paint_freeze_indicator(list: &mut DrawList, remaining_ms: f64, cx: &PaintCtx<'_>) {
    let label = ui::freeze_label(remaining_ms);
    let size = 24.0;
    let icon = font::text_height(size) * 1.3;
    let gap = font::pixel_size(size) * 2.0;
    let width = font::text_width(&label, size);
    let left = (cx.bounds.width - (icon + gap + width)) / 2.0;
    let top = ui::FREEZE_LABEL_Y;

    list.save();
    list.set_alpha(colors::FREEZE_LABEL[3]);
    draw_icon(
        list,
        Icon::Stopwatch,
        Vec2::new(left + icon / 2.0, top + font::text_height(size) / 2.0),
        icon,
    );
    list.text(
        &label,
        Vec2::new(left + icon + gap + width / 2.0, top),
        size,
        colors::with_alpha(colors::FREEZE_LABEL, 1.0),
        TextBaseline::Top,
    );
    list.restore();
}

// --- Balloons and effects ---

/// Translucent halo color around a special balloon
fn glow_color(kind: SpecialKind) -> Option<Color> {
    kind.color().map(|c| colors::rgba(c, 0.5))
}

/// Pattern plus symbol or special icon, centered on the current origin
fn draw_balloon_face(
    list: &mut DrawList,
    assets: &AssetCache,
    balloon: &Balloon,
    face: Vec2,
    icon_scale: f32,
    symbol_scale: f32,
    min_detail_size: f32,
) {
    list.image_fit(
        assets,
        AssetKey::Pattern(balloon.pattern),
        Vec2::ZERO,
        balloon.size * 2.2,
    );

    if balloon.size <= min_detail_size {
        return;
    }
    match balloon_icon(balloon.special) {
        Some(icon) => draw_icon(list, icon, face, balloon.size * icon_scale),
        None => {
            list.image_fit(
                assets,
                AssetKey::for_symbol(balloon.symbol),
                face,
                balloon.size * symbol_scale,
            );
        }
    }
}

impl Draw for Balloon {
    fn draw(&self, list: &mut DrawList, cx: &PaintCtx<'_>) {
        if self.size <= 0.0 || self.is_popped() {
            return;
        }

        list.save();
        list.translate(self.pos);
        list.rotate(self.rotation);

        if let Some(glow) = glow_color(self.special).filter(|_| self.size > 10.0) {
            let pulse = self.glow_phase.sin() * 0.3 + 0.7;
            list.glow_ellipse(Vec2::ZERO, self.size * 0.9, self.size, 20.0 + pulse * 15.0, glow);
        }

        let sway = (self.wobble * 2.0).sin() * 10.0;
        list.stroke_quadratic(
            Vec2::new(0.0, self.size * 0.9),
            Vec2::new(sway, self.size + self.string_length / 2.0),
            Vec2::new(0.0, self.size + self.string_length),
            2.0,
            colors::INK,
        );

        // Special icons show from the start of flight, symbols once big enough
        let detail = if self.special.is_special() { 0.0 } else { 30.0 };
        draw_balloon_face(list, cx.assets, self, Vec2::new(0.0, -5.0), 0.6, 0.8, detail);

        list.restore();
    }
}

/// Balloon still on the nozzle: smaller glow, no string
fn draw_inflating(list: &mut DrawList, pump: &AirPump, balloon: &Balloon, cx: &PaintCtx<'_>) {
    if balloon.size <= 0.0 {
        return;
    }
    list.save();
    list.translate(pump.balloon_anchor(balloon.size));

    if let Some(glow) = glow_color(balloon.special).filter(|_| balloon.size > 10.0) {
        list.glow_ellipse(Vec2::ZERO, balloon.size * 0.8, balloon.size, 15.0, glow);
    }
    draw_balloon_face(list, cx.assets, balloon, Vec2::ZERO, 0.5, 0.6, 20.0);

    list.restore();
}

impl Draw for Particle {
    fn draw(&self, list: &mut DrawList, _cx: &PaintCtx<'_>) {
        let s = self.size;
        list.save();
        list.translate(self.pos);
        list.rotate(self.rotation);
        list.set_alpha(self.life);
        list.fill_polygon(
            &[
                Vec2::new(-s / 2.0, -s / 2.0),
                Vec2::new(s / 2.0, -s / 3.0),
                Vec2::new(s / 2.0, s / 2.0),
                Vec2::new(-s / 3.0, s / 2.0),
            ],
            colors::rgb(self.color),
        );
        list.restore();
    }
}

/// Fill and outline colors of a score popup
fn popup_colors(popup: &ScorePopup) -> (Color, Color) {
    match popup.special {
        SpecialKind::Golden => (colors::GOLD, colors::GOLD_DARK),
        SpecialKind::TimeFreeze => (colors::FREEZE, colors::FREEZE_POPUP_DARK),
        SpecialKind::Bomb => (colors::BOMB_POPUP, colors::BOMB_DARK),
        SpecialKind::None if popup.is_special() => (colors::GOLD, colors::GOLD_DARK),
        SpecialKind::None => (colors::WHITE, colors::INK),
    }
}

impl Draw for ScorePopup {
    fn draw(&self, list: &mut DrawList, _cx: &PaintCtx<'_>) {
        const FONT_SIZE: f32 = 28.0;
        let (fill, outline) = popup_colors(self);
        let label = self.label();

        list.save();
        list.set_alpha(self.life);
        list.translate(self.pos);
        list.scale(self.scale);
        list.text_outlined(&label, Vec2::ZERO, FONT_SIZE, fill, outline, 2.0, TextBaseline::Middle);

        // The badge glyph is blank in the bitmap font; paint its icon in the gap
        if let Some(icon) = popup_icon(self.special) {
            let px = font::pixel_size(FONT_SIZE);
            let slot = self.text().chars().count() + 1;
            let left = -font::text_width(&label, FONT_SIZE) / 2.0 + slot as f32 * 6.0 * px;
            let size = font::text_height(FONT_SIZE) * 1.2;
            draw_icon(list, icon, Vec2::new(left + size / 2.0, 0.0), size);
        }
        list.restore();
    }
}

// --- Icons ---

/// Vector stand-ins for the emoji badges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Star,
    Stopwatch,
    Bomb,
    Burst,
}

fn balloon_icon(kind: SpecialKind) -> Option<Icon> {
    match kind {
        SpecialKind::None => None,
        SpecialKind::Golden => Some(Icon::Star),
        SpecialKind::TimeFreeze => Some(Icon::Stopwatch),
        SpecialKind::Bomb => Some(Icon::Bomb),
    }
}

fn popup_icon(kind: SpecialKind) -> Option<Icon> {
    match kind {
        SpecialKind::Bomb => Some(Icon::Burst),
        other => balloon_icon(other),
    }
}

/// Alternating outer/inner points starting straight up
fn star_points(center: Vec2, points: usize, outer: f32, inner: f32) -> Vec<Vec2> {
    (0..points * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = -std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / points as f32;
            center + Vec2::from_angle(angle) * radius
        })
        .collect()
}

pub fn draw_icon(list: &mut DrawList, icon: Icon, center: Vec2, size: f32) {
    let r = size / 2.0;
    match icon {
        Icon::Star => {
            let pts = star_points(center, 5, r, r * 0.4);
            list.fill_fan(center, &pts, colors::GOLD);
            list.stroke_polyline(&pts, 2.0, colors::GOLD_DARK, true);
        }
        Icon::Stopwatch => {
            let face = center + Vec2::new(0.0, r * 0.1);
            let radius = r * 0.8;
            list.fill_rect(
                Rect::centered(face - Vec2::new(0.0, radius + r * 0.1), r * 0.3, r * 0.25),
                colors::FREEZE_DARK,
            );
            list.fill_circle(face, radius, colors::FREEZE);
            list.stroke_circle(face, radius, 2.0, colors::FREEZE_DARK);
            list.stroke_line(face, face - Vec2::new(0.0, radius * 0.65), 2.0, colors::WHITE);
            list.stroke_line(face, face + Vec2::new(radius * 0.45, 0.0), 2.0, colors::WHITE);
        }
        Icon::Bomb => {
            let body = center + Vec2::new(-r * 0.1, r * 0.15);
            let radius = r * 0.7;
            let fuse_start = body + Vec2::new(radius * 0.6, -radius * 0.75);
            let fuse_end = fuse_start + Vec2::new(r * 0.25, -r * 0.25);
            list.stroke_line(fuse_start, fuse_end, 2.0, colors::INK);
            list.fill_circle(fuse_end, r * 0.15, colors::GOLD);
            list.fill_circle(body, radius, colors::BOMB);
            list.stroke_circle(body, radius, 2.0, colors::BOMB_DARK);
        }
        Icon::Burst => {
            let outer = star_points(center, 8, r, r * 0.5);
            list.fill_fan(center, &outer, colors::BOMB_POPUP);
            list.stroke_polyline(&outer, 2.0, colors::BOMB_DARK, true);
            let inner = star_points(center, 8, r * 0.5, r * 0.25);
            list.fill_fan(center, &inner, colors::GOLD);
        }
    }
}

// --- Pump and chrome ---

fn paint_pump(list: &mut DrawList, game: &Game, cx: &PaintCtx<'_>) {
    let pump = game.pump();

    if !game.assets_ready() {
        let origin = pump.origin;
        list.fill_rect(
            Rect::new(origin.x - 60.0, origin.y - 100.0, 120.0, 150.0),
            colors::LOADING_PLACEHOLDER,
        );
        list.text("Loading...", origin, 14.0, colors::INK, TextBaseline::Middle);
        return;
    }

    list.image(cx.assets, AssetKey::PumpHandle, pump.handle_rect());
    list.image(cx.assets, AssetKey::PumpBody, pump.body_rect());
    list.image(cx.assets, AssetKey::PumpInflator, pump.inflator_rect());

    if let Some(balloon) = game.inflating_balloon().filter(|b| b.is_inflating()) {
        draw_inflating(list, pump, balloon, cx);
    }

    let button = pump.auto_button_rect();
    let fill = if pump.is_auto() {
        colors::AUTO_ON
    } else {
        colors::AUTO_OFF
    };
    list.fill_rounded_rect(button, 8.0, fill);
    list.stroke_rounded_rect(button, 8.0, 2.0, colors::INK);
    let (top, bottom) = ui::auto_button_label(pump.is_auto());
    let c = button.center();
    list.text(top, c - Vec2::new(0.0, 2.0), 12.0, colors::WHITE, TextBaseline::Middle);
    list.text(bottom, c + Vec2::new(0.0, 10.0), 12.0, colors::WHITE, TextBaseline::Middle);
}

impl Draw for BackButton {
    fn draw(&self, list: &mut DrawList, _cx: &PaintCtx<'_>) {
        let c = self.center;
        list.fill_circle(c, self.radius, colors::WHITE);
        list.stroke_circle(c, self.radius, 4.0, colors::INK);
        list.fill_polygon(
            &[
                c + Vec2::new(10.0, -15.0),
                c + Vec2::new(-10.0, 0.0),
                c + Vec2::new(10.0, 15.0),
            ],
            colors::INK,
        );
    }
}

fn paint_game_over(list: &mut DrawList, game: &Game, cx: &PaintCtx<'_>) {
    let layout: GameOverLayout = game.game_over_layout();
    let mid_x = cx.bounds.width / 2.0;

    list.fill_rect(
        Rect::new(0.0, 0.0, cx.bounds.width, cx.bounds.height),
        colors::DIM,
    );
    list.fill_rounded_rect(layout.modal, 20.0, colors::WHITE);
    list.stroke_rounded_rect(layout.modal, 20.0, 5.0, colors::INK);

    let arm = Vec2::splat(ui::CROSS_SIZE / 2.0);
    let flip = Vec2::new(arm.x, -arm.y);
    let cross = layout.cross_center;
    list.stroke_line(cross - arm, cross + arm, 15.0, colors::CROSS);
    list.stroke_line(cross + flip, cross - flip, 15.0, colors::CROSS);

    list.text(
        "Game Over!",
        Vec2::new(mid_x, layout.title_y),
        36.0,
        colors::INK,
        TextBaseline::Middle,
    );
    list.text(
        &format!("Your Score: {}", game.score()),
        Vec2::new(mid_x, layout.score_y),
        24.0,
        colors::SCORE_TEXT,
        TextBaseline::Middle,
    );
    let best = if game.score() >= game.high_score() {
        colors::BEST_NEW
    } else {
        colors::BEST_OLD
    };
    list.text(
        &format!("Best: {}", game.high_score()),
        Vec2::new(mid_x, layout.best_y),
        20.0,
        best,
        TextBaseline::Middle,
    );

    let button = layout.retry_button;
    list.fill_rounded_rect_gradient(button, 10.0, colors::BUTTON_TOP, colors::BUTTON_BOTTOM);
    list.stroke_rounded_rect(button, 10.0, 3.0, colors::BUTTON_BORDER);
    list.text(
        "Try Again",
        button.center(),
        28.0,
        colors::WHITE,
        TextBaseline::Middle,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageInfo;
    use crate::persistence::MemoryStorage;
    use crate::Tuning;

    fn game() -> Game {
        Game::new(
            11,
            Bounds::new(1000.0, 800.0),
            Tuning::default(),
            Box::new(MemoryStorage::new()),
            0.0,
        )
    }

    fn loaded_assets() -> AssetCache {
        let mut assets = AssetCache::new();
        for key in AssetKey::all() {
            assets.mark_ready(key, ImageInfo { width: 64, height: 64 });
        }
        assets
    }

    fn layer_names(list: &DrawList) -> Vec<&'static str> {
        list.layers().iter().map(|(name, _)| *name).collect()
    }

    /// Vertices recorded by one layer
    fn layer_range(list: &DrawList, layer: Layer) -> std::ops::Range<usize> {
        let layers = list.layers();
        let i = layers
            .iter()
            .position(|(name, _)| *name == layer.name())
            .unwrap();
        let end = layers.get(i + 1).map_or(list.vertices().len(), |l| l.1);
        layers[i].1..end
    }

    #[test]
    fn test_layers_back_to_front() {
        let mut g = game();
        let list = paint(&g, &AssetCache::new(), 0.0);
        let expected: Vec<_> = Layer::ORDER[..10].iter().map(|l| l.name()).collect();
        assert_eq!(layer_names(&list), expected);

        g.game_over = true;
        let list = paint(&g, &AssetCache::new(), 0.0);
        assert_eq!(layer_names(&list).last(), Some(&"game_over"));
        // Offsets never go backwards
        assert!(list.layers().windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_loading_placeholder_until_ready() {
        let g = game();
        let list = paint(&g, &loaded_assets(), 0.0);
        assert!(!layer_range(&list, Layer::Pump).is_empty());
        // No pump images before the batch settles, even if some are decoded
        assert!(list.batches().iter().all(|b| b.texture.is_none()));
    }

    #[test]
    fn test_pump_images_after_ready() {
        let mut g = game();
        let assets = loaded_assets();
        g.on_assets_loaded(&assets);
        let list = paint(&g, &assets, 0.0);
        let textures: Vec<_> = list.batches().iter().filter_map(|b| b.texture).collect();
        assert_eq!(
            textures,
            vec![AssetKey::PumpHandle, AssetKey::PumpBody, AssetKey::PumpInflator]
        );
    }

    #[test]
    fn test_balloon_images_skip_missing_assets() {
        let mut g = game();
        g.create_balloon_if_needed();
        let mut balloon = g.inflating.take().unwrap();
        balloon.size = 50.0;
        balloon.special = SpecialKind::None;
        let pattern = AssetKey::Pattern(balloon.pattern);
        let symbol = AssetKey::for_symbol(balloon.symbol);
        g.balloons.push(balloon);

        let mut assets = AssetCache::new();
        let list = paint(&g, &assets, 0.0);
        assert!(list.batches().iter().all(|b| b.texture.is_none()));

        assets.mark_ready(pattern, ImageInfo { width: 100, height: 120 });
        assets.mark_failed(symbol);
        let list = paint(&g, &assets, 0.0);
        let textures: Vec<_> = list.batches().iter().filter_map(|b| b.texture).collect();
        assert_eq!(textures, vec![pattern]);
    }

    #[test]
    fn test_frozen_birds_are_tinted() {
        let mut g = game();
        let plain = paint(&g, &AssetCache::new(), 0.0);

        g.birds_frozen = true;
        g.freeze_end_ms = 3000.0;
        let frozen = paint(&g, &AssetCache::new(), 0.0);

        let a = layer_range(&plain, Layer::Birds);
        let b = layer_range(&frozen, Layer::Birds);
        // Same bird geometry first, then the indicator
        assert!(b.len() > a.len());
        let first_plain = plain.vertices()[a.start].color;
        let first_frozen = frozen.vertices()[b.start].color;
        assert_ne!(first_plain, first_frozen);
    }

    #[test]
    fn test_popup_colors() {
        let plain = ScorePopup::new(Vec2::ZERO, 1, SpecialKind::None);
        assert_eq!(popup_colors(&plain), (colors::WHITE, colors::INK));
        let chain = ScorePopup::new(Vec2::ZERO, 4, SpecialKind::None);
        assert_eq!(popup_colors(&chain).0, colors::GOLD);
        let bomb = ScorePopup::new(Vec2::ZERO, 8, SpecialKind::Bomb);
        assert_eq!(popup_icon(bomb.special), Some(Icon::Burst));
        assert_eq!(balloon_icon(SpecialKind::Bomb), Some(Icon::Bomb));
    }

    #[test]
    fn test_star_points_alternate() {
        let pts = star_points(Vec2::ZERO, 5, 10.0, 4.0);
        assert_eq!(pts.len(), 10);
        assert!(pts[0].abs_diff_eq(Vec2::new(0.0, -10.0), 1e-4));
        assert!((pts[1].length() - 4.0).abs() < 1e-4);
    }
}
