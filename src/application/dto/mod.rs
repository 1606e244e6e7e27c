//! Read models handed to presentation code

pub mod tariff_table;

pub use tariff_table::{TariffCell, TariffColumn, TariffRow, TariffTable};
