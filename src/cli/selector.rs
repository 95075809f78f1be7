use std::io::{self, IsTerminal, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    style::{Attribute, Print, SetAttribute},
    terminal::{self, ClearType},
    ExecutableCommand, QueueableCommand,
};

use crate::core::formatter::format_currency;
use crate::core::models::optimization::OptimizationSummary;

pub struct SelectableItem {
    pub id: i64,
    pub label: String,
    pub detail: String,
    pub checked: bool,
}

/// RAII guard that restores terminal state on drop (even on panic).
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        io::stdout().execute(cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = io::stdout().execute(cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Returns `Ok(Some(selected_ids))` on confirm, `Ok(None)` if not a TTY, `Err` on cancel/Ctrl-C.
pub fn interactive_select(title: &str, items: &[SelectableItem]) -> anyhow::Result<Option<Vec<i64>>> {
    if !io::stdin().is_terminal() {
        return Ok(None);
    }

    let _guard = RawModeGuard::enable()?;

    let mut checked: Vec<bool> = items.iter().map(|i| i.checked).collect();
    let mut cursor_pos: usize = 0;

    draw(title, items, &checked, cursor_pos)?;

    loop {
        if let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        {
            match (code, modifiers) {
                (KeyCode::Char('c'), KeyModifiers::CONTROL)
                | (KeyCode::Esc, _)
                | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                    clear_ui(items.len())?;
                    anyhow::bail!("cancelled");
                }
                (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                    cursor_pos = cursor_pos.saturating_sub(1);
                }
                (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                    if cursor_pos + 1 < items.len() {
                        cursor_pos += 1;
                    }
                }
                (KeyCode::Char(' '), _) => {
                    checked[cursor_pos] = !checked[cursor_pos];
                }
                (KeyCode::Char('a'), KeyModifiers::NONE) => {
                    let all_checked = checked.iter().all(|&c| c);
                    for c in checked.iter_mut() {
                        *c = !all_checked;
                    }
                }
                (KeyCode::Enter, _) => {
                    clear_ui(items.len())?;
                    return Ok(Some(selected_ids(items, &checked)));
                }
                _ => {}
            }
            draw(title, items, &checked, cursor_pos)?;
        }
    }
}

fn selected_ids(items: &[SelectableItem], checked: &[bool]) -> Vec<i64> {
    items
        .iter()
        .zip(checked.iter())
        .filter(|(_, &c)| c)
        .map(|(item, _)| item.id)
        .collect()
}

fn draw(title: &str, items: &[SelectableItem], checked: &[bool], cursor_pos: usize) -> io::Result<()> {
    let mut stdout = io::stdout();

    stdout
        .queue(cursor::MoveToColumn(0))?
        .queue(terminal::Clear(ClearType::FromCursorDown))?;

    stdout
        .queue(Print(format!("{}\r\n", title)))?
        .queue(Print("\r\n"))?
        .queue(Print(
            "  Use arrow keys to navigate, space to toggle, a: all, enter to confirm\r\n",
        ))?
        .queue(Print("\r\n"))?;

    let label_width = items.iter().map(|i| i.label.len()).max().unwrap_or(0);
    for (i, item) in items.iter().enumerate() {
        let marker = if i == cursor_pos { "> " } else { "  " };
        let check = if checked[i] { "X" } else { " " };

        if i == cursor_pos {
            stdout.queue(SetAttribute(Attribute::Reverse))?;
        }

        stdout.queue(Print(format!(
            "{marker}[{check}] {:<label_width$}  {}\r\n",
            item.label, item.detail
        )))?;

        if i == cursor_pos {
            stdout.queue(SetAttribute(Attribute::Reset))?;
        }
    }

    let count = checked.iter().filter(|&&c| c).count();
    stdout
        .queue(Print("\r\n"))?
        .queue(Print(format!(
            "  {count} selected | enter: confirm | q: cancel\r\n"
        )))?;

    // header(4) + items + footer(2)
    let total_lines = items.len() + 5;
    stdout.queue(cursor::MoveUp(total_lines as u16 + 1))?;

    stdout.flush()?;
    Ok(())
}

fn clear_ui(item_count: usize) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout
        .queue(cursor::MoveToColumn(0))?
        .queue(terminal::Clear(ClearType::FromCursorDown))?;
    let total_lines = item_count + 6;
    for _ in 0..total_lines {
        stdout.queue(Print(
            "                                                                  \r\n",
        ))?;
    }
    stdout.queue(cursor::MoveUp(total_lines as u16))?;
    stdout
        .queue(cursor::MoveToColumn(0))?
        .queue(terminal::Clear(ClearType::FromCursorDown))?;
    stdout.flush()?;
    Ok(())
}

/// Pending recommendations as selectable rows, all unchecked.
pub fn build_selectable_list(summary: &OptimizationSummary) -> Vec<SelectableItem> {
    summary
        .pending()
        .map(|o| SelectableItem {
            id: o.id,
            label: format!("#{} {}", o.id, o.title),
            detail: format!(
                "{} / {}  save {}",
                o.provider,
                o.service,
                format_currency(o.estimated_savings)
            ),
            checked: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::optimization::{Optimization, OptimizationStatus};

    fn optimization(id: i64, status: OptimizationStatus) -> Optimization {
        Optimization {
            id,
            title: format!("Recommendation {}", id),
            description: String::new(),
            estimated_savings: 10.0 * id as f64,
            status,
            service: "EC2".into(),
            provider: "AWS".into(),
            created_at: String::new(),
        }
    }

    fn summary() -> OptimizationSummary {
        OptimizationSummary {
            optimizations: vec![
                optimization(1, OptimizationStatus::Pending),
                optimization(2, OptimizationStatus::Applied),
                optimization(3, OptimizationStatus::Pending),
                optimization(4, OptimizationStatus::Ignored),
            ],
            total_estimated_savings: 100.0,
            total_applied_savings: 20.0,
            pending_count: 2,
            applied_count: 1,
            ignored_count: 1,
            savings_percentage: 5.0,
        }
    }

    #[test]
    fn build_selectable_list_only_pending() {
        let items = build_selectable_list(&summary());
        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(items.iter().all(|i| !i.checked));
        assert_eq!(items[1].label, "#3 Recommendation 3");
        assert!(items[1].detail.contains("save $30.00"));
    }

    #[test]
    fn selected_ids_follow_checks() {
        let items = build_selectable_list(&summary());
        assert_eq!(selected_ids(&items, &[false, true]), vec![3]);
        assert!(selected_ids(&items, &[false, false]).is_empty());
    }
}
