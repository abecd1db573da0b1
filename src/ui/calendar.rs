/// Calendar view: a 7-column month grid over the photo index
///
/// Day cells are colored when a day has uploads, outlined when it is
/// today, and filled when it is the active filter. Clicking a day toggles
/// the tri-state date filter shared by the journal and gallery views.

use chrono::{Datelike, NaiveDate};
use iced::widget::{button, column, row, text, Space};
use iced::{Alignment, Border, Element, Length, Theme};

use crate::state::index::PhotoIndex;
use crate::Message;

const CELL_HEIGHT: f32 = 40.0;

/// Which month the calendar is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn at(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn previous(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
    }

    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|first| first.format("%B %Y").to_string())
            .unwrap_or_default()
    }
}

/// Cells of the month grid: leading `None` blanks so day 1 lands on its
/// weekday column, then the days themselves. Weeks start on Sunday.
pub fn month_grid(year: i32, month: u32) -> Vec<Option<u32>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let Some(next_month) = next_month else {
        return Vec::new();
    };
    let days = next_month.signed_duration_since(first).num_days() as u32;

    let mut cells: Vec<Option<u32>> = Vec::new();
    cells.resize(first.weekday().num_days_from_sunday() as usize, None);
    cells.extend((1..=days).map(Some));
    cells
}

/// Tri-state day filter: selecting the already-active day clears it
pub fn toggle_filter(selection: &mut Option<NaiveDate>, day: NaiveDate) {
    *selection = if *selection == Some(day) { None } else { Some(day) };
}

pub fn view<'a>(
    cursor: MonthCursor,
    index: &PhotoIndex,
    selected: Option<NaiveDate>,
    today: NaiveDate,
) -> Element<'a, Message> {
    let header = row![
        button(text("‹").size(20))
            .style(button::text)
            .on_press(Message::PreviousMonthPressed),
        text(cursor.label())
            .size(24)
            .width(Length::Fill)
            .align_x(Alignment::Center),
        button(text("›").size(20))
            .style(button::text)
            .on_press(Message::NextMonthPressed),
    ]
    .align_y(Alignment::Center);

    let mut weekdays = row![].spacing(6);
    for name in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
        weekdays = weekdays.push(
            text(name)
                .size(13)
                .width(Length::Fill)
                .align_x(Alignment::Center)
                .style(text::secondary),
        );
    }

    let mut weeks = column![].spacing(6);
    let mut week = row![].spacing(6);
    let mut filled = 0usize;
    for cell in month_grid(cursor.year, cursor.month) {
        let element: Element<'a, Message> = match cell {
            None => blank_cell(),
            Some(day) => day_cell(cursor, day, index, selected, today),
        };
        week = week.push(element);
        filled += 1;
        if filled % 7 == 0 {
            weeks = weeks.push(week);
            week = row![].spacing(6);
        }
    }
    // Pad the trailing week so every cell keeps the same width
    if filled % 7 != 0 {
        while filled % 7 != 0 {
            week = week.push(blank_cell());
            filled += 1;
        }
        weeks = weeks.push(week);
    }

    let hint = match selected {
        Some(day) => format!(
            "Showing {}. Select it again to show everything.",
            day.format("%B %-d, %Y")
        ),
        None => "Select a day to filter the journal and gallery.".to_string(),
    };

    column![
        header,
        weekdays,
        weeks,
        text(hint).size(14).style(text::secondary)
    ]
    .spacing(14)
    .max_width(640)
    .into()
}

fn blank_cell<'a>() -> Element<'a, Message> {
    Space::new(Length::Fill, Length::Fixed(CELL_HEIGHT)).into()
}

fn day_cell<'a>(
    cursor: MonthCursor,
    day: u32,
    index: &PhotoIndex,
    selected: Option<NaiveDate>,
    today: NaiveDate,
) -> Element<'a, Message> {
    let Some(date) = NaiveDate::from_ymd_opt(cursor.year, cursor.month, day) else {
        return blank_cell();
    };
    let has_upload = index.has_photos_on(date);
    let is_selected = selected == Some(date);
    let is_today = date == today;

    button(
        text(day.to_string())
            .size(14)
            .width(Length::Fill)
            .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fixed(CELL_HEIGHT))
    .style(move |theme: &Theme, status| day_style(theme, status, has_upload, is_selected, is_today))
    .on_press(Message::CalendarDayPressed(date))
    .into()
}

fn day_style(
    theme: &Theme,
    status: button::Status,
    has_upload: bool,
    is_selected: bool,
    is_today: bool,
) -> button::Style {
    let palette = theme.extended_palette();

    let (background, text_color) = if is_selected {
        (palette.primary.strong.color, palette.primary.strong.text)
    } else if has_upload {
        (palette.primary.weak.color, palette.primary.weak.text)
    } else {
        (palette.background.weak.color, palette.background.weak.text)
    };

    let background = match status {
        button::Status::Hovered if !is_selected => palette.secondary.base.color,
        _ => background,
    };

    let border = if is_today {
        Border {
            color: palette.primary.base.color,
            width: 2.0,
            radius: 8.0.into(),
        }
    } else {
        Border {
            radius: 8.0.into(),
            ..Border::default()
        }
    };

    button::Style {
        background: Some(background.into()),
        text_color,
        border,
        ..button::Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_grid_leap_february() {
        // 2024-02-01 was a Thursday: four leading blanks, 29 days
        let cells = month_grid(2024, 2);
        assert_eq!(cells.len(), 4 + 29);
        assert!(cells[..4].iter().all(Option::is_none));
        assert_eq!(cells[4], Some(1));
        assert_eq!(*cells.last().unwrap(), Some(29));
    }

    #[test]
    fn test_month_grid_starting_on_sunday_has_no_blanks() {
        // 2023-10-01 was a Sunday
        let cells = month_grid(2023, 10);
        assert_eq!(cells.first(), Some(&Some(1)));
        assert_eq!(cells.len(), 31);
    }

    #[test]
    fn test_cursor_wraps_across_year_boundaries() {
        let mut cursor = MonthCursor { year: 2024, month: 1 };
        cursor.previous();
        assert_eq!(cursor, MonthCursor { year: 2023, month: 12 });

        cursor.next();
        assert_eq!(cursor, MonthCursor { year: 2024, month: 1 });
    }

    #[test]
    fn test_cursor_label() {
        let cursor = MonthCursor { year: 2024, month: 3 };
        assert_eq!(cursor.label(), "March 2024");
    }

    #[test]
    fn test_toggle_filter_round_trip() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let other = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let mut selection = None;

        toggle_filter(&mut selection, day);
        assert_eq!(selection, Some(day));

        // Selecting a different day replaces the filter
        toggle_filter(&mut selection, other);
        assert_eq!(selection, Some(other));

        // Selecting the active day again clears it
        toggle_filter(&mut selection, other);
        assert_eq!(selection, None);
    }
}
