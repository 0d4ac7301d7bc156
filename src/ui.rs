use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::question::QuestionSource;
use crate::render::{OptionMark, Status};

const HORIZONTAL_MARGIN: u16 = 2;
const STAT_COLUMN_WIDTH: usize = 16;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = bold_style.fg(Color::Green);
        let red_bold_style = bold_style.fg(Color::Red);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(4), // outcome card
                Constraint::Min(6),    // question
                Constraint::Length(5), // explanation
                Constraint::Length(1), // legend
            ])
            .split(area);

        let board = self.board();

        // outcome card
        let status_style = match board.status {
            Status::Pending => bold_style.fg(Color::Yellow),
            Status::Correct => green_bold_style,
            Status::Wrong => red_bold_style,
        };
        let stats = [
            (format!("{}%", board.stats.accuracy), "Accuracy"),
            (board.stats.answered.to_string(), "Answered"),
            (board.stats.streak.to_string(), "Current Streak"),
            (board.stats.best.to_string(), "Best Streak"),
        ];
        let values = stats
            .iter()
            .map(|(v, _)| Span::styled(pad(v), bold_style))
            .collect::<Vec<_>>();
        let labels = stats
            .iter()
            .map(|(_, l)| Span::styled(pad(l), dim_style))
            .collect::<Vec<_>>();
        Paragraph::new(vec![Line::from(values), Line::from(labels)])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(Span::styled(format!(" {} ", board.status), status_style))
                    .title_alignment(Alignment::Center),
            )
            .render(chunks[0], buf);

        let Some(question) = self.current_question() else {
            Paragraph::new(Span::styled("This bank has no questions.", italic_style))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);
            return;
        };

        // question card
        let marking = board.marking(&question.id);
        let chosen = self.chosen();
        let mut lines = vec![
            Line::from(Span::styled(question.stem.clone(), bold_style)),
            Line::default(),
        ];
        for option in &question.options {
            let mark = marking
                .map(|m| m.mark(option.label))
                .unwrap_or(OptionMark::Plain);
            let (glyph, style) = match mark {
                OptionMark::Correct => ("✓", green_bold_style),
                OptionMark::Wrong => ("✗", red_bold_style),
                OptionMark::Dim => (" ", dim_style),
                OptionMark::Plain => (" ", Style::default()),
            };
            let radio = if chosen == Some(option.label) {
                "(•)"
            } else {
                "( )"
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{glyph} {radio} "), style),
                Span::styled(format!("{}. ", option.label), style.add_modifier(Modifier::BOLD)),
                Span::styled(option.text.clone(), style),
            ]));
        }

        let mut meta = vec![format!("{}/{}", self.current + 1, self.bank.len())];
        meta.extend(question.topic.as_ref().map(|t| format!("Topic: {t}")));
        meta.extend(question.model.as_ref().map(|m| format!("Model: {m}")));
        meta.extend(question.category.as_ref().map(|c| format!("Category: {c}")));
        meta.extend(question.difficulty.as_ref().map(|d| format!("Difficulty: {d}")));
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(format!(" {} ", meta.join(" | ")), dim_style)),
            )
            .render(chunks[1], buf);

        // explanation panel
        let explanation = if let Some(err) = &self.last_error {
            Span::styled(err.clone(), red_bold_style)
        } else if !board.shows_explanations() {
            Span::styled("Explanations are hidden.", dim_style)
        } else {
            match board.explanation(&question.id) {
                Some(e) if e.is_correct() => Span::styled(e.message(), green_bold_style),
                Some(e) => Span::styled(e.message(), Style::default()),
                None => Span::styled("Select an answer to see feedback here.", italic_style),
            }
        };
        Paragraph::new(Line::from(explanation))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Explanation "))
            .render(chunks[2], buf);

        let progress: String = (0..self.bank.questions().len())
            .map(|i| match self.answered_state(i) {
                Some(true) => '●',
                Some(false) => '✗',
                None => '·',
            })
            .collect();
        Paragraph::new(Line::from(vec![
            Span::styled(progress, dim_style),
            Span::styled(
                "  (a-z) choose (enter) check (←/→) move (tab) next mistake (^r) restart (esc) quit",
                italic_style,
            ),
        ]))
        .render(chunks[3], buf);
    }
}

fn pad(s: &str) -> String {
    let width = s.width();
    let total = STAT_COLUMN_WIDTH.saturating_sub(width);
    let left = total / 2;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(total - left))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::config::Config;
    use crate::question::{AnswerLabel, Question};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let q = Question::new("q1", 'B', 3)
            .unwrap()
            .with_stem("Which ratio measures liquidity?")
            .with_explanation("Current assets over current liabilities.");
        App::new(
            QuestionBank::new("t", vec![q]).unwrap(),
            Config {
                shuffle_questions: false,
                show_explanations: true,
            },
        )
    }

    #[test]
    fn initial_screen_shows_pending_and_zero_stats() {
        let text = screen_text(&app());
        assert!(text.contains("PENDING"));
        assert!(text.contains("0%"));
        assert!(text.contains("Best Streak"));
        assert!(text.contains("Which ratio measures liquidity?"));
        assert!(text.contains("Select an answer to see feedback here."));
    }

    #[test]
    fn wrong_answer_screen_shows_feedback() {
        let mut app = app();
        app.choose(AnswerLabel::new('A').unwrap());
        app.check();
        let text = screen_text(&app);
        assert!(text.contains("WRONG"));
        assert!(text.contains("Correct answer: B"));
        assert!(text.contains("✗"));
    }

    #[test]
    fn grading_error_shows_even_with_explanations_hidden() {
        let q = Question::new("q1", 'B', 3).unwrap();
        let mut app = App::new(
            QuestionBank::new("t", vec![q]).unwrap(),
            Config {
                shuffle_questions: false,
                show_explanations: false,
            },
        );
        assert!(screen_text(&app).contains("Explanations are hidden."));

        app.last_error = Some("question q1 has no option E".to_string());
        let text = screen_text(&app);
        assert!(text.contains("question q1 has no option E"));
        assert!(!text.contains("Explanations are hidden."));
    }

    #[test]
    fn question_title_lists_metadata() {
        let mut q = Question::new("q1", 'A', 2).unwrap().with_stem("Gross margin?");
        q.topic = Some("Profitability".into());
        q.difficulty = Some("hard".into());
        let app = App::new(
            QuestionBank::new("t", vec![q]).unwrap(),
            Config {
                shuffle_questions: false,
                show_explanations: true,
            },
        );
        let text = screen_text(&app);
        assert!(text.contains("1/1 | Topic: Profitability | Difficulty: hard"));
    }

    #[test]
    fn pad_centers_within_column() {
        assert_eq!(pad("0").width(), STAT_COLUMN_WIDTH);
        assert_eq!(pad("Current Streak").width(), STAT_COLUMN_WIDTH);
    }
}
