//! Dispatch board screen and the overlays opened over it.

use overlay::OverlayAction;
use surface::Element;

/// Main screen: toolbar, transfer list, status line.
pub fn dispatch_board() -> Element {
    Element::col()
        .id("board")
        .child(
            Element::row()
                .id("toolbar")
                .child(Element::button("New booking").id("new-booking"))
                .child(Element::button("Filters").id("open-filters"))
                .child(Element::button("Quit").id("quit")),
        )
        .child(
            Element::col()
                .id("transfers")
                .children((1..=3).map(|n| Element::link(format!("Transfer #{n}")).id(format!("transfer-{n}")))),
        )
        .child(Element::text("3 transfers scheduled").id("status"))
}

/// Dialog content for a new booking.
pub fn booking_form() -> Element {
    Element::col()
        .id("booking")
        .child(Element::text("Passenger"))
        .child(Element::input("").id("booking-passenger"))
        .child(Element::text("Pickup"))
        .child(Element::input("").id("booking-pickup"))
        .child(
            Element::row()
                .child(OverlayAction::Close.tag(Element::button("Cancel").id("booking-cancel")))
                .child(OverlayAction::Confirm.tag(Element::button("Book").id("booking-submit"))),
        )
}

/// Drawer content with list filters.
pub fn filters_panel() -> Element {
    Element::col()
        .id("filters")
        .child(Element::text("Status"))
        .child(Element::select().id("filter-status"))
        .child(Element::text("Driver"))
        .child(Element::input("").id("filter-driver"))
        .child(OverlayAction::Close.tag(Element::button("Apply").id("filter-apply")))
}
