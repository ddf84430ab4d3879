//! Overlay placement on screen.

use surface::Rect;

use crate::request::{DrawerSide, OverlayKind, OverlayRequest, OverlaySize};

/// Calculate where a renderer should place `request` on `screen`.
pub fn overlay_area(screen: Rect, request: &OverlayRequest) -> Rect {
    let options = request.options();
    match request.kind() {
        OverlayKind::Dialog => dialog_area(screen, options.size),
        OverlayKind::Drawer => drawer_area(screen, options.size, options.side),
    }
}

fn fraction(size: OverlaySize, auto: f32) -> f32 {
    match size {
        OverlaySize::Auto => auto,
        OverlaySize::Sm => 0.30,
        OverlaySize::Md => 0.50,
        OverlaySize::Lg => 0.80,
        OverlaySize::Xl => 0.90,
        OverlaySize::Full => 1.0,
        // Callers handle fixed sizes before asking for a fraction
        OverlaySize::Fixed { .. } => 1.0,
    }
}

fn scale(total: u16, fraction: f32, min: u16) -> u16 {
    ((total as f32 * fraction) as u16).max(min).min(total)
}

/// Dialogs are centered.
pub fn dialog_area(screen: Rect, size: OverlaySize) -> Rect {
    let (width, height) = match size {
        OverlaySize::Fixed { width, height } => (width.min(screen.width), height.min(screen.height)),
        other => {
            let f = fraction(other, 0.50);
            (scale(screen.width, f, 10), scale(screen.height, f, 3))
        }
    };

    let x = screen.x + screen.width.saturating_sub(width) / 2;
    let y = screen.y + screen.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Drawers hug their edge and span the whole cross axis.
pub fn drawer_area(screen: Rect, size: OverlaySize, side: DrawerSide) -> Rect {
    match side {
        DrawerSide::Left | DrawerSide::Right => {
            let width = match size {
                OverlaySize::Fixed { width, .. } => width.min(screen.width),
                other => scale(screen.width, fraction(other, 0.30), 10),
            };
            let x = if side == DrawerSide::Left {
                screen.x
            } else {
                screen.right() - width
            };
            Rect::new(x, screen.y, width, screen.height)
        }
        DrawerSide::Top | DrawerSide::Bottom => {
            let height = match size {
                OverlaySize::Fixed { height, .. } => height.min(screen.height),
                other => scale(screen.height, fraction(other, 0.30), 3),
            };
            let y = if side == DrawerSide::Top {
                screen.y
            } else {
                screen.bottom() - height
            };
            Rect::new(screen.x, y, screen.width, height)
        }
    }
}
