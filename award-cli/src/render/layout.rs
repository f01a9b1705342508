//! Placement of name, serial number and date on the template

use image::{ColorType, DynamicImage, RgbImage, RgbaImage};

use super::{FontSet, TextStyle, draw_outlined};
use crate::award::CertificateRequest;
use crate::config::LayoutConfig;

/// Draw origins of the three texts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placements {
    pub name: (i32, i32),
    pub number: (i32, i32),
    pub date: (i32, i32),
}

/// Compute draw origins for an image of `width` x `height`
///
/// The name sits at a fixed position. The serial number is right- and
/// bottom-aligned using its measured box; the date is bottom-aligned.
pub fn place_texts(
    width: u32,
    height: u32,
    fonts: &FontSet,
    request: &CertificateRequest,
    layout: &LayoutConfig,
) -> Placements {
    let (w, h) = (width as i32, height as i32);

    let name_box = fonts.name.measure(&request.name);
    log::debug!(
        "Name '{}' measures {}x{} px",
        request.name,
        name_box.width(),
        name_box.height()
    );

    let number_box = fonts.number.measure(&request.serial_number);
    let [right_margin, bottom_margin] = layout.number_margin;
    let number = (
        w - number_box.width() - right_margin,
        h - number_box.bottom - bottom_margin,
    );

    let date_box = fonts.date.measure(&request.date_text());
    let [left_margin, date_bottom_margin] = layout.date_margin;
    let date = (left_margin, h - date_box.bottom - date_bottom_margin);

    Placements {
        name: (layout.name_position[0], layout.name_position[1]),
        number,
        date,
    }
}

/// Draw the three outlined texts onto the template
pub fn render_certificate(
    template: DynamicImage,
    request: &CertificateRequest,
    fonts: &FontSet,
    layout: &LayoutConfig,
) -> RgbaImage {
    let mut canvas = template.into_rgba8();
    let placements = place_texts(canvas.width(), canvas.height(), fonts, request, layout);
    log::debug!("Text placements: {:?}", placements);

    draw_outlined(
        &mut canvas,
        fonts.name.as_ref(),
        &request.name,
        placements.name,
        &TextStyle::from(layout.name_style),
    );
    draw_outlined(
        &mut canvas,
        fonts.number.as_ref(),
        &request.serial_number,
        placements.number,
        &TextStyle::from(layout.number_style),
    );
    draw_outlined(
        &mut canvas,
        fonts.date.as_ref(),
        &request.date_text(),
        placements.date,
        &TextStyle::from(layout.date_style),
    );

    canvas
}

/// Convert the rendered canvas to plain RGB for PDF export
///
/// Templates carrying alpha or a palette lose the alpha channel here.
pub fn normalize_for_export(canvas: RgbaImage, template_color: ColorType) -> RgbImage {
    if template_color.has_alpha() {
        log::debug!("Dropping alpha channel of {:?} template", template_color);
    }
    DynamicImage::ImageRgba8(canvas).into_rgb8()
}
