// Inline error shown under the upload drop zone
use std::borrow::Cow;

use iced::widget::{Container, Row, Text};
use iced::{Alignment, Color, Element, Length};

use crate::client::models::messages::Message;

const ERROR_BG: Color = Color::from_rgb(0.35, 0.08, 0.1);
const ERROR_TEXT: Color = Color::from_rgb(1.0, 0.55, 0.55);

pub fn view<'a>(msg: impl Into<Cow<'a, str>>) -> Element<'a, Message> {
    Container::new(
        Row::new()
            .spacing(8)
            .align_items(Alignment::Center)
            .push(Text::new("!").size(16).style(ERROR_TEXT))
            .push(Text::new(msg).size(14).style(ERROR_TEXT)),
    )
    .padding([8, 12])
    .width(Length::Fill)
    .style(iced::theme::Container::Custom(Box::new(|_: &iced::Theme| {
        iced::widget::container::Appearance {
            background: Some(iced::Background::Color(ERROR_BG)),
            border: iced::Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    })))
    .into()
}
