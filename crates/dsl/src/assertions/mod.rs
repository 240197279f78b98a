//! The assertion catalog, grouped by polarity.

pub(crate) mod does_not_see;
pub(crate) mod sees;

use understudy_core::locator::Locator;

fn alert() -> Locator {
    Locator::role("alert")
}

fn progressbar() -> Locator {
    Locator::role("progressbar")
}
