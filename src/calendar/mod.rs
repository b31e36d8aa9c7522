mod layout;
mod month;
mod pager;
mod util;
mod view;
mod widget;
pub(crate) use self::layout::{width_for, Hit};
pub(crate) use self::month::DayCell;
pub(crate) use self::pager::{MonthPager, VisibleRange, WindowSize};
pub(crate) use self::util::YearMonth;
pub(crate) use self::view::CalendarView;
pub(crate) use self::widget::Calendar;
