use iced::widget::{progress_bar, Column, Container, Row, Space, Text};
use iced::{Alignment, Color, Element, Font, Length};

use crate::client::models::health::{HealthResult, ScoreCard, Severity};
use crate::client::models::messages::Message;

const CARD_BG: Color = Color::from_rgb(0.18, 0.19, 0.36);
const LIST_BG: Color = Color::from_rgb(0.12, 0.13, 0.26);
const TEXT_PRIMARY: Color = Color::WHITE;
const TEXT_SECONDARY: Color = Color::from_rgb(0.7, 0.7, 0.7);

const BOLD_FONT: Font = Font {
    family: iced::font::Family::SansSerif,
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Negative => Color::from_rgb(0.9, 0.25, 0.25),
        Severity::Caution => Color::from_rgb(0.92, 0.7, 0.1),
        Severity::Positive => Color::from_rgb(0.15, 0.7, 0.35),
    }
}

fn progress_style(severity: Severity) -> iced::theme::ProgressBar {
    match severity {
        Severity::Negative => iced::theme::ProgressBar::Danger,
        Severity::Caution => iced::theme::ProgressBar::Primary,
        Severity::Positive => iced::theme::ProgressBar::Success,
    }
}

fn badge(card: &ScoreCard<'_>) -> Element<'static, Message> {
    let color = severity_color(card.band.severity());
    Container::new(Text::new(card.label()).size(14).style(Color::WHITE))
        .padding([4, 12])
        .style(iced::theme::Container::Custom(Box::new(move |_: &iced::Theme| {
            iced::widget::container::Appearance {
                background: Some(iced::Background::Color(color)),
                border: iced::Border {
                    radius: 12.0.into(),
                    ..Default::default()
                },
                ..Default::default()
            }
        })))
        .into()
}

/// Score card for a finished analysis.
pub fn view(result: &HealthResult) -> Element<'_, Message> {
    let card = result.card();

    let title = Row::new()
        .align_items(Alignment::Center)
        .push(Text::new("Health Score").font(BOLD_FONT).size(22).style(TEXT_PRIMARY))
        .push(Space::new(Length::Fill, Length::Fixed(0.0)))
        .push(badge(&card));

    let score = Column::new()
        .spacing(8)
        .push(Text::new(card.score_text()).size(14).style(TEXT_PRIMARY))
        .push(
            progress_bar(0.0..=100.0, card.score.value() as f32)
                .height(Length::Fixed(12.0))
                .style(progress_style(card.band.severity())),
        );

    let items = card.ingredients.iter().fold(Column::new().spacing(4), |col, ingredient| {
        col.push(Text::new(format!("• {}", ingredient)).size(14).style(TEXT_PRIMARY))
    });

    let ingredients = Column::new()
        .spacing(8)
        .push(Text::new(card.ingredients_heading()).font(BOLD_FONT).size(14).style(TEXT_SECONDARY))
        .push(
            Container::new(items)
                .padding(12)
                .width(Length::Fill)
                .style(iced::theme::Container::Custom(Box::new(|_: &iced::Theme| {
                    iced::widget::container::Appearance {
                        background: Some(iced::Background::Color(LIST_BG)),
                        border: iced::Border {
                            radius: 8.0.into(),
                            ..Default::default()
                        },
                        ..Default::default()
                    }
                }))),
        );

    Container::new(Column::new().spacing(24).push(title).push(score).push(ingredients))
        .padding(24)
        .width(Length::Fill)
        .max_width(720.0)
        .style(iced::theme::Container::Custom(Box::new(|_: &iced::Theme| {
            iced::widget::container::Appearance {
                background: Some(iced::Background::Color(CARD_BG)),
                text_color: Some(TEXT_PRIMARY),
                border: iced::Border {
                    radius: 16.0.into(),
                    ..Default::default()
                },
                shadow: iced::Shadow {
                    offset: iced::Vector::new(0.0, 4.0),
                    blur_radius: 12.0,
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                },
            }
        })))
        .into()
}
