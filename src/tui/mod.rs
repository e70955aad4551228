//! Ratatui-based prediction form.
//!
//! Seven fields on the left, the current input row and the prediction on the
//! right. Categorical fields cycle through their allowed values; scores move
//! within 0..=100 so the range check lives here and not in the service.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::pipeline::predict_record;
use crate::domain::{
    Categorical, Field, Gender, InputRecord, Lunch, ParentalEducation, RaceEthnicity,
    TestPreparation,
};
use crate::error::AppError;
use crate::service::PredictionService;

/// Start the TUI.
pub fn run(service: PredictionService) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(service);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Current widget values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormState {
    pub gender: Gender,
    pub race_ethnicity: RaceEthnicity,
    pub parental_level_of_education: ParentalEducation,
    pub lunch: Lunch,
    pub test_preparation_course: TestPreparation,
    pub reading_score: u8,
    pub writing_score: u8,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            gender: Gender::Female,
            race_ethnicity: RaceEthnicity::GroupB,
            parental_level_of_education: ParentalEducation::HighSchool,
            lunch: Lunch::Standard,
            test_preparation_course: TestPreparation::None,
            reading_score: 69,
            writing_score: 68,
        }
    }
}

impl FormState {
    pub fn display_value(&self, field: Field) -> String {
        match field {
            Field::Gender => self.gender.as_str().to_string(),
            Field::RaceEthnicity => self.race_ethnicity.as_str().to_string(),
            Field::ParentalLevelOfEducation => {
                self.parental_level_of_education.as_str().to_string()
            }
            Field::Lunch => self.lunch.as_str().to_string(),
            Field::TestPreparationCourse => self.test_preparation_course.as_str().to_string(),
            Field::ReadingScore => self.reading_score.to_string(),
            Field::WritingScore => self.writing_score.to_string(),
        }
    }

    /// Move `field` by `delta` steps: cycle categories, clamp scores to 0..=100.
    pub fn adjust(&mut self, field: Field, delta: i32) {
        fn step<T: Categorical>(value: T, delta: i32) -> T {
            let mut v = value;
            for _ in 0..delta.unsigned_abs() {
                v = if delta > 0 { v.next() } else { v.prev() };
            }
            v
        }
        fn clamp_score(value: u8, delta: i32) -> u8 {
            (i32::from(value) + delta).clamp(0, 100) as u8
        }

        match field {
            Field::Gender => self.gender = step(self.gender, delta),
            Field::RaceEthnicity => self.race_ethnicity = step(self.race_ethnicity, delta),
            Field::ParentalLevelOfEducation => {
                self.parental_level_of_education = step(self.parental_level_of_education, delta)
            }
            Field::Lunch => self.lunch = step(self.lunch, delta),
            Field::TestPreparationCourse => {
                self.test_preparation_course = step(self.test_preparation_course, delta)
            }
            Field::ReadingScore => self.reading_score = clamp_score(self.reading_score, delta),
            Field::WritingScore => self.writing_score = clamp_score(self.writing_score, delta),
        }
    }

    /// Validate the widget values into a record, the same way any other
    /// input surface does.
    pub fn to_record(&self) -> Result<InputRecord, crate::error::InvalidValueError> {
        InputRecord::new(
            self.gender.as_str(),
            self.race_ethnicity.as_str(),
            self.parental_level_of_education.as_str(),
            self.lunch.as_str(),
            self.test_preparation_course.as_str(),
            f64::from(self.reading_score),
            f64::from(self.writing_score),
        )
    }
}

/// What the result panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Score(f64),
    Failed(String),
}

pub struct App {
    service: PredictionService,
    pub form: FormState,
    pub selected_field: usize,
    pub outcome: Option<Outcome>,
    /// Validation failure shown next to the offending field.
    pub field_error: Option<(Field, String)>,
    pub status: String,
}

impl App {
    pub fn new(service: PredictionService) -> Self {
        Self {
            service,
            form: FormState::default(),
            selected_field: 0,
            outcome: None,
            field_error: None,
            status: "Fill in the form and press Enter to predict.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn selected(&self) -> Field {
        Field::ALL[self.selected_field]
    }

    /// Apply one key press; returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Tab => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::PageDown => self.adjust(-10),
            KeyCode::PageUp => self.adjust(10),
            KeyCode::Enter | KeyCode::Char('p') => self.predict(),
            KeyCode::Char('r') => self.reset(),
            _ => {}
        }
        false
    }

    fn adjust(&mut self, delta: i32) {
        let field = self.selected();
        // Categorical fields move one value at a time regardless of page size.
        let delta = if field.is_numeric() { delta } else { delta.signum() };
        self.form.adjust(field, delta);
        self.status = format!("{}: {}", field.label(), self.form.display_value(field));
    }

    /// Validate the form and run the prediction pipeline.
    pub fn predict(&mut self) {
        self.field_error = None;
        let record = match self.form.to_record() {
            Ok(record) => record,
            Err(err) => {
                self.status = "Fix the highlighted field.".to_string();
                self.field_error = Some((err.field, err.to_string()));
                return;
            }
        };

        match predict_record(&self.service, &record) {
            Ok(output) => {
                self.status = "Prediction made.".to_string();
                self.outcome = Some(Outcome::Score(output.score));
            }
            Err(err) => {
                self.status = "Prediction failed.".to_string();
                self.outcome = Some(Outcome::Failed(err.to_string()));
            }
        }
    }

    /// Clear displayed results; the form values stay as they are.
    pub fn reset(&mut self) {
        self.outcome = None;
        self.field_error = None;
        self.status = "Inputs reset.".to_string();
    }

    pub fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "Math Score Prediction",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Predicts a student's math score from demographics, lunch type, test preparation and other scores.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(48), Constraint::Min(0)])
            .split(area);
        self.draw_form(frame, columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(columns[1]);
        self.draw_input_table(frame, right[0]);
        self.draw_outcome(frame, right[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|&field| {
                let mut lines = vec![Line::from(vec![
                    Span::styled(
                        format!("{:<28}", field.label()),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::raw(format!("‹ {} ›", self.form.display_value(field))),
                ])];
                if let Some((bad, msg)) = &self.field_error {
                    if *bad == field {
                        lines.push(Line::from(Span::styled(
                            format!("  {msg}"),
                            Style::default().fg(Color::Red),
                        )));
                    }
                }
                ListItem::new(Text::from(lines))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Inputs").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_input_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let header = Row::new(Field::ALL.iter().map(|f| f.name().to_string()))
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
        let values = Row::new(Field::ALL.iter().map(|&f| self.form.display_value(f)));
        let widths = Field::ALL.map(|f| Constraint::Min(f.name().len().min(12) as u16));

        let table = Table::new(vec![values], widths)
            .header(header)
            .column_spacing(1)
            .block(Block::default().title("Input Data").borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_outcome(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Prediction").borders(Borders::ALL);
        let p = match &self.outcome {
            None => {
                Paragraph::new("Press Enter to predict.").style(Style::default().fg(Color::Gray))
            }
            Some(Outcome::Score(score)) => Paragraph::new(crate::report::format_prediction(*score))
                .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Some(Outcome::Failed(msg)) => Paragraph::new(format!("An error occurred: {msg}"))
                .style(Style::default().fg(Color::Red)),
        };
        frame.render_widget(p.wrap(Wrap { trim: true }).block(block), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  PgUp/PgDn ±10  Enter predict  r reset  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nalgebra::DMatrix;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::artifacts::{Artifacts, FeatureTransform, Regressor};
    use crate::domain::FeatureFrame;
    use crate::error::PredictionError;

    struct WritingOnly;

    impl FeatureTransform for WritingOnly {
        fn n_features(&self) -> usize {
            1
        }

        fn transform(&self, frame: &FeatureFrame) -> Result<DMatrix<f64>, PredictionError> {
            let col = frame
                .column("writing_score")
                .ok_or_else(|| PredictionError::transform("no writing_score"))?;
            let values: Vec<f64> = col.iter().filter_map(|c| c.as_number()).collect();
            Ok(DMatrix::from_column_slice(values.len(), 1, &values))
        }
    }

    struct PlusOne;

    impl Regressor for PlusOne {
        fn n_features(&self) -> usize {
            1
        }

        fn predict_scores(&self, x: &DMatrix<f64>) -> Result<Vec<f64>, PredictionError> {
            Ok(x.column(0).iter().map(|v| v + 1.0).collect())
        }
    }

    fn app() -> App {
        let artifacts = Artifacts::new(Arc::new(WritingOnly), Arc::new(PlusOne)).unwrap();
        App::new(PredictionService::from_artifacts(artifacts))
    }

    fn screen_rows(app: &App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    fn screen(app: &App) -> String {
        screen_rows(app).concat()
    }

    #[test]
    fn defaults_match_the_form() {
        let form = FormState::default();
        assert_eq!(form.reading_score, 69);
        assert_eq!(form.writing_score, 68);
        assert_eq!(form.race_ethnicity, RaceEthnicity::GroupB);
    }

    #[test]
    fn keys_move_selection_and_adjust_values() {
        let mut app = app();
        app.handle_key(KeyCode::Right);
        assert_eq!(app.form.gender, Gender::Male);

        for _ in 0..10 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.selected(), Field::WritingScore);

        app.handle_key(KeyCode::PageUp);
        app.handle_key(KeyCode::PageUp);
        assert_eq!(app.form.writing_score, 88);
        for _ in 0..5 {
            app.handle_key(KeyCode::PageUp);
        }
        assert_eq!(app.form.writing_score, 100);

        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.form.reading_score, 68);
    }

    #[test]
    fn page_keys_step_categories_once() {
        let mut app = app();
        app.selected_field = 1;
        app.handle_key(KeyCode::PageUp);
        assert_eq!(app.form.race_ethnicity, RaceEthnicity::GroupC);
    }

    #[test]
    fn predict_then_reset() {
        let mut app = app();
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.outcome, Some(Outcome::Score(69.0)));
        assert!(screen(&app).contains("Predicted Math Score: 69.00"));

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.outcome, None);
        assert_eq!(app.status, "Inputs reset.");
        assert!(!screen(&app).contains("Predicted Math Score"));
    }

    #[test]
    fn prediction_failure_is_displayed() {
        let paths = crate::artifacts::ArtifactPaths::from_dir("no/such/dir");
        let mut app = App::new(PredictionService::per_call(paths));
        app.predict();
        match &app.outcome {
            Some(Outcome::Failed(msg)) => assert!(msg.contains("not found"), "{msg}"),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(screen(&app).contains("An error occurred"));
    }

    #[test]
    fn field_error_renders_under_its_field() {
        let mut app = app();
        let err = Lunch::parse("x").unwrap_err();
        app.field_error = Some((err.field, err.to_string()));

        let rows = screen_rows(&app);
        let lunch = rows
            .iter()
            .position(|r| r.contains("Lunch Type"))
            .expect("lunch row");
        assert!(rows[lunch + 1].contains("Invalid lunch: 'x'."), "{}", rows[lunch + 1]);
        assert!(!rows[lunch - 1].contains("Invalid"));

        app.predict();
        assert_eq!(app.field_error, None);
        assert!(!screen(&app).contains("Invalid lunch"));
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
