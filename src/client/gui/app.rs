use std::sync::Arc;

use iced::widget::{scrollable, Button, Column, Container, Row, Space, Text};
use iced::{event, window, Alignment, Application, Color, Command, Element, Event, Length, Subscription, Theme};
use log::{debug, info};

use crate::client::gui::views::logger::{logger_view, LogLevel};
use crate::client::gui::views::{score_panel, upload_panel};
use crate::client::models::app_state::HealthAppState;
use crate::client::models::messages::Message;
use crate::client::models::upload::{DragEvent, UploadFile, UploadPanel, UploadSource};
use crate::client::services::analyzer::IngredientAnalyzer;
use crate::client::services::file_loader;

const BG_MAIN: Color = Color::from_rgb(0.06, 0.07, 0.18);
const TEXT_PRIMARY: Color = Color::WHITE;
const TEXT_SECONDARY: Color = Color::from_rgb(0.7, 0.7, 0.7);

pub struct HealthScoreApp {
    pub state: HealthAppState,
    pub upload: UploadPanel<Message>,
    pub analyzer: Arc<dyn IngredientAnalyzer>,
}

impl HealthScoreApp {
    pub fn new_with(analyzer: Arc<dyn IngredientAnalyzer>) -> Self {
        Self {
            state: HealthAppState::default(),
            upload: UploadPanel::new(Message::ImageUploaded),
            analyzer,
        }
    }

    fn analyze(&self, file: UploadFile) -> Command<Message> {
        let analyzer = self.analyzer.clone();
        Command::perform(
            async move { analyzer.analyze(file.shared_bytes(), file.mime_type()).await },
            Message::AnalysisFinished,
        )
    }
}

fn drag_events(event: Event, _status: event::Status) -> Option<Message> {
    match event {
        Event::Window(_, window::Event::FileHovered(_)) => Some(Message::Drag(DragEvent::Enter)),
        Event::Window(_, window::Event::FilesHoveredLeft) => Some(Message::Drag(DragEvent::Leave)),
        Event::Window(_, window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        _ => None,
    }
}

impl Application for HealthScoreApp {
    type Message = Message;
    type Theme = Theme;
    type Executor = iced::executor::Default;
    type Flags = Arc<dyn IngredientAnalyzer>;

    fn new(analyzer: Self::Flags) -> (Self, Command<Message>) {
        info!("Health score window ready (analyzer: {})", analyzer.name());
        (HealthScoreApp::new_with(analyzer), Command::none())
    }

    fn title(&self) -> String {
        "Health Score".to_string()
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        let is_loading = self.state.is_loading();
        match message {
            Message::Drag(event) => {
                self.upload.drag(event);
            }
            Message::FileDropped(path) => {
                self.upload.drag(DragEvent::Drop);
                if is_loading {
                    debug!("drop of {} ignored while processing", path.display());
                    return Command::none();
                }
                return Command::perform(file_loader::inspect(path), |result| Message::FileInspected {
                    source: UploadSource::Drop,
                    result,
                });
            }
            Message::OpenFilePicker => {
                if is_loading {
                    return Command::none();
                }
                return Command::perform(file_loader::pick_image(), Message::FilePicked);
            }
            Message::FilePicked(None) => {
                debug!("file picker cancelled");
            }
            Message::FilePicked(Some(path)) => {
                return Command::perform(file_loader::inspect(path), |result| Message::FileInspected {
                    source: UploadSource::Picker,
                    result,
                });
            }
            Message::FileInspected { source, result } => match result {
                Ok(candidate) => {
                    if self.upload.screen(&candidate, source, is_loading) {
                        return Command::perform(file_loader::load_upload(candidate), move |result| {
                            Message::FileLoaded { source, result }
                        });
                    }
                }
                Err(e) => self.upload.report(e),
            },
            Message::FileLoaded { source, result } => {
                let forwarded = match result {
                    Ok(file) => self.upload.receive(file, source, is_loading),
                    Err(e) => {
                        self.upload.report(e);
                        None
                    }
                };
                if let Some(msg) = forwarded {
                    return self.update(msg);
                }
            }
            Message::ClearUpload => {
                if self.upload.clear(is_loading) {
                    self.state.log(LogLevel::Info, "Upload cleared");
                }
            }
            Message::ImageUploaded(file) => {
                if let Some(file) = self.state.begin(file) {
                    return self.analyze(file);
                }
            }
            Message::AnalysisFinished(outcome) => {
                self.state.finish(outcome);
            }
            Message::RetryAnalysis => {
                if let Some(file) = self.state.retry() {
                    return self.analyze(file);
                }
            }
            Message::ClearLog => {
                self.state.logger.clear();
            }
        }
        Command::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(drag_events)
    }

    fn view(&self) -> Element<Message> {
        let is_loading = self.state.is_loading();

        let header = Column::new()
            .spacing(8)
            .align_items(Alignment::Center)
            .push(Text::new("Health Score").size(36).style(TEXT_PRIMARY))
            .push(
                Text::new(
                    "Upload an image of your product's ingredient list and get an instant health score based on the ingredients.",
                )
                .size(16)
                .style(TEXT_SECONDARY),
            );

        let mut content = Column::new()
            .spacing(24)
            .padding(32)
            .align_items(Alignment::Center)
            .width(Length::Fill)
            .push(header)
            .push(logger_view(&self.state.logger))
            .push(upload_panel::view(&self.upload, is_loading));

        if let Some(error) = self.state.failure() {
            let mut retry = Button::new(Text::new("Retry analysis").size(15))
                .style(iced::theme::Button::Destructive)
                .padding([8, 16]);
            if self.state.can_retry() {
                retry = retry.on_press(Message::RetryAnalysis);
            }
            content = content.push(
                Row::new()
                    .spacing(12)
                    .align_items(Alignment::Center)
                    .push(Text::new(format!("Analysis failed: {}", error)).size(14).style(TEXT_SECONDARY))
                    .push(Space::new(Length::Fixed(8.0), Length::Fixed(0.0)))
                    .push(retry),
            );
        }

        if let Some(result) = self.state.result() {
            content = content.push(score_panel::view(result));
        }

        Container::new(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(|_: &iced::Theme| {
                iced::widget::container::Appearance {
                    background: Some(iced::Background::Color(BG_MAIN)),
                    ..Default::default()
                }
            })))
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::app_state::AnalysisPhase;
    use crate::client::models::upload::{UploadCandidate, UploadError};
    use crate::client::services::analyzer::{AnalysisError, PlaceholderAnalyzer};
    use std::time::Duration;

    fn app() -> HealthScoreApp {
        HealthScoreApp::new_with(Arc::new(PlaceholderAnalyzer::new(Duration::ZERO)))
    }

    fn loaded(name: &str, mime: &str) -> Message {
        Message::FileLoaded {
            source: UploadSource::Drop,
            result: Ok(UploadFile::new(name, mime, vec![0u8; 64])),
        }
    }

    fn inspected(name: &str, mime: &str, size: u64) -> Message {
        Message::FileInspected {
            source: UploadSource::Drop,
            result: Ok(UploadCandidate {
                path: name.into(),
                name: name.to_string(),
                mime_type: mime.to_string(),
                size,
            }),
        }
    }

    /// Runs the analysis the window scheduled and feeds the outcome back.
    async fn complete_analysis(app: &mut HealthScoreApp) {
        let file = app.state.pending.clone().expect("an analysis is in flight");
        let outcome = app.analyzer.analyze(file.shared_bytes(), file.mime_type()).await;
        let _ = app.update(Message::AnalysisFinished(outcome));
    }

    fn assert_drink_score(app: &HealthScoreApp) {
        let card = app.state.result().expect("score panel is shown").card();
        assert_eq!(card.label(), "Excellent");
        assert_eq!(card.score_text(), "Score: 75%");
        assert_eq!(card.ingredient_count(), 5);
        assert_eq!(
            card.ingredients,
            ["Water", "Sugar", "Natural Flavors", "Citric Acid", "Vitamin C"]
        );
    }

    #[test]
    fn accepted_file_starts_processing() {
        let mut app = app();
        let _ = app.update(loaded("label.png", "image/png"));
        assert!(app.state.is_loading());
        assert!(app.upload.has_preview());
    }

    #[test]
    fn rejected_file_never_reaches_the_orchestrator() {
        let mut app = app();
        let _ = app.update(loaded("notes.txt", "text/plain"));
        assert!(!app.state.is_loading());
        assert_eq!(app.state.phase, AnalysisPhase::Idle);
        assert!(app.upload.error().is_some());
    }

    #[test]
    fn drops_while_processing_only_reset_drag_state() {
        let mut app = app();
        let _ = app.update(loaded("label.png", "image/png"));
        let _ = app.update(Message::Drag(DragEvent::Over));
        let _ = app.update(Message::FileDropped("other.png".into()));
        assert!(!app.upload.state().drag_active());
        assert_eq!(app.upload.preview_stats().created(), 1);
    }

    #[test]
    fn clear_is_refused_while_processing() {
        let mut app = app();
        let _ = app.update(loaded("label.png", "image/png"));
        let _ = app.update(Message::ClearUpload);
        assert!(app.upload.has_preview());
    }

    #[tokio::test]
    async fn png_upload_ends_with_an_excellent_score() {
        let mut app = app();
        let _ = app.update(Message::FileLoaded {
            source: UploadSource::Drop,
            result: Ok(UploadFile::new("drink.png", "image/png", vec![0u8; 2_000_000])),
        });
        assert!(app.state.is_loading());
        assert!(app.upload.has_preview());

        complete_analysis(&mut app).await;
        assert!(!app.state.is_loading());
        assert_eq!(app.state.phase, AnalysisPhase::Done);
        assert_drink_score(&app);
    }

    #[tokio::test]
    async fn failed_analysis_is_retried_from_the_window() {
        let mut app = app();
        let _ = app.update(loaded("label.png", "image/png"));
        let _ = app.update(Message::AnalysisFinished(Err(AnalysisError::Timeout)));
        assert!(!app.state.is_loading());
        assert!(app.state.can_retry());
        assert!(app.state.result().is_none());

        let _ = app.update(Message::RetryAnalysis);
        assert!(app.state.is_loading());

        complete_analysis(&mut app).await;
        assert!(!app.state.is_loading());
        assert!(!app.state.can_retry());
        assert_drink_score(&app);
    }

    #[test]
    fn oversized_file_is_rejected_before_it_is_read() {
        let mut app = app();
        let _ = app.update(inspected("huge.png", "image/png", 256 * 1024 * 1024));
        assert!(!app.state.is_loading());
        assert!(!app.upload.has_preview());
        assert!(matches!(app.upload.error(), Some(UploadError::TooLarge { .. })));
    }

    #[test]
    fn unreadable_file_is_reported_inline() {
        let mut app = app();
        let _ = app.update(Message::FileInspected {
            source: UploadSource::Picker,
            result: Err(UploadError::Unreadable {
                name: "gone.png".to_string(),
                reason: "No such file or directory".to_string(),
            }),
        });
        assert_eq!(
            app.upload.error().map(|e| e.to_string()).as_deref(),
            Some("Could not read gone.png: No such file or directory")
        );
    }
}
