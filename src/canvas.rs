use std::sync::Arc;

use egui::{Align, Color32, FontFamily, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::document::{BackgroundImage, CanvasSize};
use crate::layer::{FontWeight, LayerId, TextAlign, TextLayer};
use crate::raster::TextRasterizer;
use crate::surface::{ModifiedGeometry, RasterSnapshot, RenderSurface, SurfaceEvent};

const HANDLE_SIZE: f32 = 8.0;
const ROTATION_HANDLE_OFFSET: f32 = 30.0;
const HANDLE_COLOR: Color32 = Color32::from_rgb(14, 165, 233);
const MIN_BOX_SIZE: f32 = 20.0;
const EMPTY_CANVAS_FILL: Color32 = Color32::from_rgb(0xf5, 0xf5, 0xf5);

/// One text drawable on the surface.
///
/// Carries copies of the styling fields and the owning layer's id; it never
/// holds the layer itself, so the model and the drawable graph only meet
/// through id lookups.
#[derive(Debug, Clone)]
struct TextObject {
    layer_id: LayerId,
    text: String,
    pos: Pos2,
    size: Vec2,
    rotation: f32,
    font_size: f32,
    font_family: String,
    font_weight: FontWeight,
    color: Color32,
    opacity: f32,
    align: TextAlign,
    z_index: usize,
}

impl TextObject {
    fn rect(&self) -> Rect {
        Rect::from_min_size(self.pos, self.size)
    }

    fn geometry(&self) -> ModifiedGeometry {
        ModifiedGeometry {
            x: self.pos.x,
            y: self.pos.y,
            width: self.size.x,
            height: self.size.y,
            rotation: self.rotation,
        }
    }

    /// Rebuilds a layer value for the CPU compositor. Only used for export.
    fn to_layer(&self) -> TextLayer {
        TextLayer {
            id: self.layer_id,
            text: self.text.clone(),
            x: self.pos.x,
            y: self.pos.y,
            width: self.size.x,
            height: self.size.y,
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            font_weight: self.font_weight,
            color: self.color,
            opacity: self.opacity,
            rotation: self.rotation,
            text_align: self.align,
            z_index: self.z_index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragMode {
    Move,
    Resize,
    Rotate,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    id: LayerId,
    mode: DragMode,
    start_pointer: Pos2,
    start_pos: Pos2,
    start_size: Vec2,
    start_rotation: f32,
}

/// The egui-backed rendering surface: draws the composition, hit-tests text
/// boxes, and turns pointer interaction into [`SurfaceEvent`]s.
pub struct CanvasSurface {
    size: CanvasSize,
    background: Option<Arc<BackgroundImage>>,
    bg_texture: Option<egui::TextureHandle>,
    objects: Vec<TextObject>,
    active: Option<LayerId>,
    events: Vec<SurfaceEvent>,
    drag: Option<DragState>,
    rasterizer: Option<TextRasterizer>,
    disposed: bool,
}

impl CanvasSurface {
    /// `font_bytes` is the TTF used by the export compositor; drawing on
    /// screen goes through egui's own fonts.
    pub fn new(font_bytes: &[u8]) -> Self {
        let rasterizer = match TextRasterizer::from_bytes(font_bytes) {
            Ok(rasterizer) => Some(rasterizer),
            Err(err) => {
                log::error!("Failed to load export font: {err}");
                None
            }
        };
        Self {
            size: CanvasSize::default(),
            background: None,
            bg_texture: None,
            objects: Vec::new(),
            active: None,
            events: Vec::new(),
            drag: None,
            rasterizer,
            disposed: false,
        }
    }

    /// Draws the surface into the UI and processes pointer interaction.
    pub fn show(&mut self, ui: &mut Ui) {
        if self.disposed {
            return;
        }
        let canvas_size = Vec2::new(self.size.width as f32, self.size.height as f32);
        let (response, painter) = ui.allocate_painter(canvas_size, Sense::click_and_drag());
        let origin = response.rect.min.to_vec2();

        self.paint_background(ui.ctx(), &painter, response.rect);
        for object in &self.objects {
            paint_text_object(&painter, origin, object);
        }
        if let Some(active) = self.active_object() {
            paint_selection_chrome(&painter, origin, &active.rect());
        }

        self.handle_pointer(&response, origin);
    }

    fn active_object(&self) -> Option<&TextObject> {
        let id = self.active?;
        self.objects.iter().find(|o| o.layer_id == id)
    }

    fn paint_background(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect) {
        match &self.background {
            Some(bg) => {
                let texture = self.bg_texture.get_or_insert_with(|| {
                    let image = egui::ColorImage::from_rgba_unmultiplied(
                        [bg.width as usize, bg.height as usize],
                        &bg.rgba,
                    );
                    ctx.load_texture("background", image, egui::TextureOptions::LINEAR)
                });
                painter.image(
                    texture.id(),
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                painter.rect_filled(rect, 0.0, EMPTY_CANVAS_FILL);
            }
        }
    }

    /// Click selects the topmost box under the pointer; dragging the body
    /// moves it, the bottom-right handle resizes, the handle above rotates.
    /// A finished drag emits one ObjectModified with the final geometry.
    fn handle_pointer(&mut self, response: &egui::Response, origin: Vec2) {
        let pointer: Option<Pos2> = response.interact_pointer_pos().map(|p| p - origin);

        if response.drag_started() {
            if let Some(pointer) = pointer {
                self.begin_drag(pointer);
            }
        } else if response.clicked() {
            if let Some(pointer) = pointer {
                self.select_at(pointer);
            }
        }

        if response.dragged() {
            if let (Some(drag), Some(pointer)) = (self.drag, pointer) {
                self.apply_drag(drag, pointer);
            }
        }

        if response.drag_stopped() {
            if let Some(drag) = self.drag.take() {
                if let Some(object) = self.objects.iter().find(|o| o.layer_id == drag.id) {
                    self.events.push(SurfaceEvent::ObjectModified {
                        id: drag.id,
                        geometry: object.geometry(),
                    });
                }
            }
        }
    }

    fn begin_drag(&mut self, pointer: Pos2) {
        // The active object's handles win over body hits of other objects.
        let active = self
            .active_object()
            .map(|o| (o.layer_id, o.pos, o.size, o.rotation, o.rect()));
        if let Some((id, pos, size, rotation, rect)) = active {
            let mode = if handle_rect(resize_handle_pos(&rect)).contains(pointer) {
                Some(DragMode::Resize)
            } else if handle_rect(rotation_handle_pos(&rect)).contains(pointer) {
                Some(DragMode::Rotate)
            } else {
                None
            };
            if let Some(mode) = mode {
                self.drag = Some(DragState {
                    id,
                    mode,
                    start_pointer: pointer,
                    start_pos: pos,
                    start_size: size,
                    start_rotation: rotation,
                });
                return;
            }
        }

        self.select_at(pointer);
        let active = self
            .active_object()
            .map(|o| (o.layer_id, o.pos, o.size, o.rotation, o.rect()));
        if let Some((id, pos, size, rotation, rect)) = active {
            if rect.contains(pointer) {
                self.drag = Some(DragState {
                    id,
                    mode: DragMode::Move,
                    start_pointer: pointer,
                    start_pos: pos,
                    start_size: size,
                    start_rotation: rotation,
                });
            }
        }
    }

    /// Hit-tests the topmost object and updates the active selection,
    /// queueing the matching selection event.
    fn select_at(&mut self, pointer: Pos2) {
        let hit = self
            .objects
            .iter()
            .rev()
            .find(|o| o.rect().contains(pointer))
            .map(|o| o.layer_id);
        match hit {
            Some(id) if self.active != Some(id) => {
                self.active = Some(id);
                self.events.push(SurfaceEvent::SelectionCreated(id));
            }
            None if self.active.is_some() => {
                self.active = None;
                self.events.push(SurfaceEvent::SelectionCleared);
            }
            _ => {}
        }
    }

    fn apply_drag(&mut self, drag: DragState, pointer: Pos2) {
        let Some(object) = self.objects.iter_mut().find(|o| o.layer_id == drag.id) else {
            return;
        };
        let delta = pointer - drag.start_pointer;
        match drag.mode {
            DragMode::Move => {
                object.pos = drag.start_pos + delta;
            }
            DragMode::Resize => {
                object.size = Vec2::new(
                    (drag.start_size.x + delta.x).max(MIN_BOX_SIZE),
                    (drag.start_size.y + delta.y).max(MIN_BOX_SIZE),
                );
            }
            DragMode::Rotate => {
                let center = Rect::from_min_size(drag.start_pos, drag.start_size).center();
                let to_pointer = pointer - center;
                // The handle rests directly above the box, so straight up is
                // zero rotation.
                let angle = to_pointer.y.atan2(to_pointer.x).to_degrees() + 90.0;
                object.rotation = angle;
            }
        }
    }
}

impl RenderSurface for CanvasSurface {
    fn set_dimensions(&mut self, size: CanvasSize) {
        self.size = size;
    }

    fn set_background(&mut self, image: Arc<BackgroundImage>) {
        self.background = Some(image);
        self.bg_texture = None;
    }

    fn clear_background(&mut self) {
        self.background = None;
        self.bg_texture = None;
    }

    fn clear_text_objects(&mut self) {
        self.objects.clear();
        self.drag = None;
    }

    fn add_text_object(&mut self, layer: &TextLayer) {
        self.objects.push(TextObject {
            layer_id: layer.id,
            text: layer.text.clone(),
            pos: Pos2::new(layer.x, layer.y),
            size: Vec2::new(layer.width, layer.height),
            rotation: layer.rotation,
            font_size: layer.font_size,
            font_family: layer.font_family.clone(),
            font_weight: layer.font_weight,
            color: layer.color,
            opacity: layer.opacity,
            align: layer.text_align,
            z_index: layer.z_index,
        });
    }

    fn set_active(&mut self, id: Option<LayerId>) {
        self.active = id;
    }

    fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    fn snapshot(&self) -> Option<RasterSnapshot> {
        if self.disposed {
            return None;
        }
        let rasterizer = self.rasterizer.as_ref()?;
        let layers: Vec<TextLayer> = self.objects.iter().map(TextObject::to_layer).collect();
        let refs: Vec<&TextLayer> = layers.iter().collect();
        Some(rasterizer.composite(
            self.size.width,
            self.size.height,
            self.background.as_deref(),
            &refs,
        ))
    }

    fn dispose(&mut self) {
        self.objects.clear();
        self.events.clear();
        self.background = None;
        self.bg_texture = None;
        self.drag = None;
        self.active = None;
        self.disposed = true;
    }
}

fn handle_rect(center: Pos2) -> Rect {
    Rect::from_center_size(center, Vec2::splat(HANDLE_SIZE * 2.0))
}

fn resize_handle_pos(rect: &Rect) -> Pos2 {
    rect.right_bottom()
}

fn rotation_handle_pos(rect: &Rect) -> Pos2 {
    Pos2::new(rect.center().x, rect.min.y - ROTATION_HANDLE_OFFSET)
}

fn paint_text_object(painter: &egui::Painter, origin: Vec2, object: &TextObject) {
    let font_id = FontId::new(
        object.font_size,
        FontFamily::Name(object.font_family.as_str().into()),
    );
    let color = object.color.gamma_multiply(object.opacity);

    let mut job = egui::text::LayoutJob::simple(
        object.text.clone(),
        font_id,
        color,
        object.size.x,
    );
    job.halign = match object.align {
        TextAlign::Left => Align::LEFT,
        TextAlign::Center => Align::Center,
        TextAlign::Right => Align::RIGHT,
    };
    let galley = painter.fonts(|fonts| fonts.layout_job(job));

    // With a non-left halign the galley is positioned by that edge.
    let anchor_x = match object.align {
        TextAlign::Left => object.pos.x,
        TextAlign::Center => object.pos.x + object.size.x / 2.0,
        TextAlign::Right => object.pos.x + object.size.x,
    };
    let anchor = Pos2::new(anchor_x, object.pos.y) + origin;

    // Rotation pivots on the box center, the same pivot the export compositor
    // uses. `with_angle` rotates about the shape's position, so the galley is
    // placed at the anchor's rotated location to compose to a center pivot.
    let mut shape = egui::epaint::TextShape::new(anchor, galley, color);
    if object.rotation != 0.0 {
        let angle = object.rotation.to_radians();
        let center = object.rect().center() + origin;
        let offset = anchor - center;
        let (sin, cos) = angle.sin_cos();
        shape.pos = center
            + Vec2::new(
                offset.x * cos - offset.y * sin,
                offset.x * sin + offset.y * cos,
            );
        shape = shape.with_angle(angle);
    }
    painter.add(shape);
}

fn paint_selection_chrome(painter: &egui::Painter, origin: Vec2, rect: &Rect) {
    let rect = rect.translate(origin);
    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, HANDLE_COLOR));
    painter.rect_filled(
        Rect::from_center_size(rect.right_bottom(), Vec2::splat(HANDLE_SIZE)),
        0.0,
        HANDLE_COLOR,
    );
    let rotation_pos = Pos2::new(rect.center().x, rect.min.y - ROTATION_HANDLE_OFFSET);
    painter.line_segment(
        [Pos2::new(rect.center().x, rect.min.y), rotation_pos],
        Stroke::new(1.0, HANDLE_COLOR),
    );
    painter.circle_stroke(rotation_pos, HANDLE_SIZE / 2.0, Stroke::new(2.0, HANDLE_COLOR));
}
