use iced::widget::{mouse_area, Button, Column, Container, Image, Row, Space, Svg, Text};
use iced::{Alignment, Color, ContentFit, Element, Font, Length};

use crate::client::gui::widgets::alert;
use crate::client::models::messages::Message;
use crate::client::models::upload::UploadPanel;
use crate::client::services::file_loader::image_types_hint;
use crate::client::services::preview_store::Preview;

const CARD_BG: Color = Color::from_rgb(0.18, 0.19, 0.36);
const ZONE_BG: Color = Color::from_rgb(0.12, 0.13, 0.26);
const ZONE_BORDER: Color = Color::from_rgb(0.4, 0.4, 0.5);
const ACCENT_COLOR: Color = Color::from_rgb(0.0, 0.7, 0.3);
const TEXT_PRIMARY: Color = Color::WHITE;
const TEXT_SECONDARY: Color = Color::from_rgb(0.7, 0.7, 0.7);
const TEXT_DIMMED: Color = Color::from_rgb(0.45, 0.45, 0.5);

const BOLD_FONT: Font = Font {
    family: iced::font::Family::SansSerif,
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

const PREVIEW_HEIGHT: f32 = 260.0;

fn card_appearance(_: &iced::Theme) -> iced::widget::container::Appearance {
    iced::widget::container::Appearance {
        background: Some(iced::Background::Color(CARD_BG)),
        text_color: Some(TEXT_PRIMARY),
        border: iced::Border {
            width: 0.0,
            color: Color::TRANSPARENT,
            radius: 16.0.into(),
        },
        shadow: iced::Shadow {
            offset: iced::Vector::new(0.0, 4.0),
            blur_radius: 12.0,
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
        },
    }
}

fn drop_zone_appearance(dragging: bool) -> impl Fn(&iced::Theme) -> iced::widget::container::Appearance {
    move |_: &iced::Theme| iced::widget::container::Appearance {
        background: Some(iced::Background::Color(ZONE_BG)),
        text_color: Some(TEXT_PRIMARY),
        border: iced::Border {
            width: 2.0,
            color: if dragging { ACCENT_COLOR } else { ZONE_BORDER },
            radius: 12.0.into(),
        },
        ..Default::default()
    }
}

pub fn view(panel: &UploadPanel<Message>, is_loading: bool) -> Element<'_, Message> {
    let state = panel.state();

    let header = Column::new()
        .spacing(4)
        .push(Text::new("Upload Ingredient List").font(BOLD_FONT).size(22).style(TEXT_PRIMARY))
        .push(
            Text::new("Upload an image of your product's ingredient list to get a health score")
                .size(14)
                .style(TEXT_SECONDARY),
        );

    let hint_color = if is_loading { TEXT_DIMMED } else { TEXT_SECONDARY };
    let preview = state
        .preview
        .as_ref()
        .and_then(|handle| panel.previews().image(handle));

    let mut zone_content = Column::new()
        .spacing(12)
        .align_items(Alignment::Center)
        .width(Length::Fill);

    zone_content = match preview {
        Some(Preview::Raster(image)) => zone_content.push(
            Image::new(image.clone())
                .width(Length::Fill)
                .height(Length::Fixed(PREVIEW_HEIGHT))
                .content_fit(ContentFit::Contain),
        ),
        Some(Preview::Vector(svg)) => zone_content.push(
            Svg::new(svg.clone())
                .width(Length::Fill)
                .height(Length::Fixed(PREVIEW_HEIGHT))
                .content_fit(ContentFit::Contain),
        ),
        None => zone_content
            .push(Space::new(Length::Fill, Length::Fixed(24.0)))
            .push(
                Text::new("Drag and drop your image here, or click to select a file")
                    .size(15)
                    .style(hint_color),
            )
            .push(
                Text::new(format!("{}, up to 5MB", image_types_hint()))
                    .size(12)
                    .style(hint_color),
            )
            .push(Space::new(Length::Fill, Length::Fixed(24.0))),
    };

    if is_loading {
        zone_content = zone_content.push(Text::new("Processing...").size(16).style(ACCENT_COLOR));
    }

    let zone = Container::new(zone_content)
        .padding(24)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(drop_zone_appearance(
            state.drag_active(),
        ))));

    let zone: Element<Message> = if is_loading {
        zone.into()
    } else {
        mouse_area(zone).on_press(Message::OpenFilePicker).into()
    };

    let error: Element<Message> = match panel.error() {
        Some(e) => alert::view(e.to_string()),
        None => Space::new(Length::Fill, Length::Fixed(0.0)).into(),
    };

    let selection = Text::new(
        state
            .selection
            .as_deref()
            .map(|name| format!("Selected: {}", name))
            .unwrap_or_else(|| "No file selected".to_string()),
    )
    .size(13)
    .style(TEXT_SECONDARY);

    let mut select_btn = Button::new(Text::new("Select image").size(15))
        .style(iced::theme::Button::Primary)
        .padding([8, 16]);
    if !is_loading {
        select_btn = select_btn.on_press(Message::OpenFilePicker);
    }

    let mut clear_btn = Button::new(Text::new("Clear").size(15))
        .style(iced::theme::Button::Secondary)
        .padding([8, 16]);
    if panel.can_clear(is_loading) {
        clear_btn = clear_btn.on_press(Message::ClearUpload);
    }

    let actions = Row::new()
        .spacing(8)
        .align_items(Alignment::Center)
        .push(selection)
        .push(Space::new(Length::Fill, Length::Fixed(0.0)))
        .push(select_btn)
        .push(clear_btn);

    Container::new(
        Column::new()
            .spacing(16)
            .push(header)
            .push(zone)
            .push(error)
            .push(actions),
    )
    .padding(24)
    .width(Length::Fill)
    .max_width(720.0)
    .style(iced::theme::Container::Custom(Box::new(card_appearance)))
    .into()
}
