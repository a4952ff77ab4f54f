//! Transaction recording tests
//!
//! Tests for the purchase/sale/return flows: stock effects, failure cases
//! that must leave nothing behind, ledger id monotonicity, and the
//! write-time total_price.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use shared::models::{total_price, InventoryItem, Shift, TransactionRecord, TransactionType};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// POS Simulation
// ============================================================================

/// In-memory mirror of the recording flows: a ledger that only appends and
/// a stock table adjusted per the same rules as the service.
pub struct PosSim {
    stock: Vec<InventoryItem>,
    ledger: Vec<TransactionRecord>,
    next_product_id: i64,
    next_transaction_id: i64,
}

impl PosSim {
    pub fn new() -> Self {
        Self {
            stock: Vec::new(),
            ledger: Vec::new(),
            next_product_id: 1,
            next_transaction_id: 1,
        }
    }

    pub fn add_product(
        &mut self,
        name: &str,
        unit: &str,
        quantity: Decimal,
        unit_price: Decimal,
        supplier: &str,
    ) -> i64 {
        let product_id = self.next_product_id;
        self.next_product_id += 1;
        self.stock.push(InventoryItem {
            product_id,
            product_name: name.to_string(),
            unit: unit.to_string(),
            quantity,
            unit_price,
            supplier: supplier.to_string(),
        });
        product_id
    }

    fn append_ledger(
        &mut self,
        transaction_type: TransactionType,
        date: NaiveDate,
        staff: &str,
        shift: Option<&str>,
        product_id: i64,
        name: &str,
        unit: &str,
        quantity: Decimal,
        unit_price: Decimal,
        supplier: &str,
        return_reason: Option<&str>,
    ) -> i64 {
        let transaction_id = self.next_transaction_id;
        self.next_transaction_id += 1;
        self.ledger.push(TransactionRecord {
            transaction_id,
            transaction_type,
            date,
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            staff: staff.to_string(),
            shift: shift.map(|s| s.to_string()),
            product_id,
            product_name: name.to_string(),
            unit: unit.to_string(),
            quantity,
            unit_price,
            total_price: total_price(quantity, unit_price),
            supplier: supplier.to_string(),
            return_reason: return_reason.map(|r| r.to_string()),
        });
        transaction_id
    }

    fn decrement(&mut self, product_id: i64, unit: &str, quantity: Decimal) {
        if let Some(idx) = self
            .stock
            .iter()
            .position(|r| r.product_id == product_id && r.unit == unit)
        {
            let updated = self.stock[idx].quantity - quantity;
            if updated <= Decimal::ZERO {
                self.stock.remove(idx);
            } else {
                self.stock[idx].quantity = updated;
            }
        }
    }

    pub fn record_purchase(
        &mut self,
        date: NaiveDate,
        supplier: &str,
        name: &str,
        unit: &str,
        quantity: Decimal,
        unit_price: Decimal,
        staff: &str,
    ) -> Result<i64, &'static str> {
        if quantity <= Decimal::ZERO {
            return Err("Quantity must be greater than 0");
        }
        let product_id = match self
            .stock
            .iter()
            .position(|r| r.product_name == name && r.unit == unit)
        {
            Some(idx) => {
                self.stock[idx].quantity += quantity;
                self.stock[idx].product_id
            }
            None => self.add_product(name, unit, quantity, unit_price, supplier),
        };
        Ok(self.append_ledger(
            TransactionType::Purchase,
            date,
            staff,
            None,
            product_id,
            name,
            unit,
            quantity,
            unit_price,
            supplier,
            None,
        ))
    }

    pub fn record_sale(
        &mut self,
        date: NaiveDate,
        shift: Shift,
        staff: &str,
        name: &str,
        unit: &str,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<i64, &'static str> {
        if quantity <= Decimal::ZERO {
            return Err("Quantity must be greater than 0");
        }
        if !self.stock.iter().any(|r| r.product_name == name) {
            return Err("Product not found");
        }
        let row = self
            .stock
            .iter()
            .find(|r| r.product_name == name && r.unit == unit)
            .ok_or("Unit not found")?;
        if row.quantity < quantity {
            return Err("Insufficient stock");
        }
        let (product_id, supplier) = (row.product_id, row.supplier.clone());

        // Ledger row first, stock decrement second
        let id = self.append_ledger(
            TransactionType::Sale,
            date,
            staff,
            Some(shift.as_str()),
            product_id,
            name,
            unit,
            quantity,
            unit_price,
            &supplier,
            None,
        );
        self.decrement(product_id, unit, quantity);
        Ok(id)
    }

    pub fn record_return(
        &mut self,
        date: NaiveDate,
        supplier: &str,
        name: &str,
        unit: &str,
        quantity: Decimal,
        staff: &str,
        reason: &str,
    ) -> Result<i64, &'static str> {
        if quantity <= Decimal::ZERO {
            return Err("Quantity must be greater than 0");
        }
        let row = self
            .stock
            .iter()
            .find(|r| r.product_name == name && r.unit == unit && r.supplier == supplier)
            .ok_or("Stock for supplier not found")?;
        if row.quantity < quantity {
            return Err("Insufficient stock");
        }
        let (product_id, unit_price) = (row.product_id, row.unit_price);

        let id = self.append_ledger(
            TransactionType::Return,
            date,
            staff,
            None,
            product_id,
            name,
            unit,
            quantity,
            unit_price,
            supplier,
            Some(reason),
        );
        self.decrement(product_id, unit, quantity);
        Ok(id)
    }

    pub fn quantity_of(&self, name: &str, unit: &str) -> Option<Decimal> {
        self.stock
            .iter()
            .find(|r| r.product_name == name && r.unit == unit)
            .map(|r| r.quantity)
    }

    pub fn ledger(&self) -> &[TransactionRecord] {
        &self.ledger
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The walk-through scenario: register, purchase, sell
    #[test]
    fn test_purchase_then_sale_scenario() {
        let mut pos = PosSim::new();
        pos.add_product("Tomato", "kg", dec("0"), dec("70"), "GreenFarm");

        pos.record_purchase(
            date(2024, 3, 5),
            "GreenFarm",
            "Tomato",
            "kg",
            dec("25"),
            dec("70"),
            "Amy",
        )
        .unwrap();
        assert_eq!(pos.quantity_of("Tomato", "kg"), Some(dec("25")));

        pos.record_sale(
            date(2024, 3, 5),
            Shift::Morning,
            "Bob",
            "Tomato",
            "kg",
            dec("10"),
            dec("75"),
        )
        .unwrap();
        assert_eq!(pos.quantity_of("Tomato", "kg"), Some(dec("15")));

        let sale = pos.ledger().last().unwrap();
        assert_eq!(sale.transaction_type, TransactionType::Sale);
        assert_eq!(sale.total_price, dec("750"));
        assert_eq!(sale.shift.as_deref(), Some("早班"));
        assert_eq!(sale.supplier, "GreenFarm");
    }

    /// A purchase of a new unit creates a fresh row with a fresh id
    #[test]
    fn test_purchase_new_unit_mints_new_id() {
        let mut pos = PosSim::new();
        pos.record_purchase(
            date(2024, 3, 1),
            "綠色蔬果",
            "有機番茄",
            "公斤",
            dec("25"),
            dec("70"),
            "王小明",
        )
        .unwrap();
        pos.record_purchase(
            date(2024, 3, 2),
            "綠色蔬果",
            "有機番茄",
            "顆",
            dec("50"),
            dec("15"),
            "王小明",
        )
        .unwrap();

        let ids: Vec<i64> = pos.ledger().iter().map(|t| t.product_id).collect();
        assert_ne!(ids[0], ids[1]);

        // A repeat purchase of the first unit reuses its product id
        pos.record_purchase(
            date(2024, 3, 3),
            "綠色蔬果",
            "有機番茄",
            "公斤",
            dec("5"),
            dec("70"),
            "王小明",
        )
        .unwrap();
        assert_eq!(pos.ledger()[2].product_id, ids[0]);
        assert_eq!(pos.quantity_of("有機番茄", "公斤"), Some(dec("30")));
    }

    /// An oversell fails with no ledger row and no stock mutation
    #[test]
    fn test_oversell_leaves_nothing_behind() {
        let mut pos = PosSim::new();
        pos.add_product("有機小白菜", "把", dec("5"), dec("35"), "有機農場");

        let result = pos.record_sale(
            date(2024, 3, 5),
            Shift::Afternoon,
            "李小華",
            "有機小白菜",
            "把",
            dec("6"),
            dec("35"),
        );
        assert_eq!(result, Err("Insufficient stock"));
        assert!(pos.ledger().is_empty());
        assert_eq!(pos.quantity_of("有機小白菜", "把"), Some(dec("5")));
    }

    /// Selling an unknown product vs an unknown unit are distinct failures
    #[test]
    fn test_sale_not_found_failures() {
        let mut pos = PosSim::new();
        pos.add_product("有機番茄", "公斤", dec("25"), dec("70"), "綠色蔬果");

        let missing_product = pos.record_sale(
            date(2024, 3, 5),
            Shift::Morning,
            "王小明",
            "有機青菜",
            "把",
            dec("1"),
            dec("30"),
        );
        assert_eq!(missing_product, Err("Product not found"));

        let missing_unit = pos.record_sale(
            date(2024, 3, 5),
            Shift::Morning,
            "王小明",
            "有機番茄",
            "箱",
            dec("1"),
            dec("400"),
        );
        assert_eq!(missing_unit, Err("Unit not found"));
        assert!(pos.ledger().is_empty());
    }

    /// A return must match the supplier, not just the (name, unit) pair
    #[test]
    fn test_return_requires_matching_supplier() {
        let mut pos = PosSim::new();
        pos.add_product("新鮮蘋果", "顆", dec("50"), dec("20"), "有機農場");

        let wrong_supplier = pos.record_return(
            date(2024, 3, 8),
            "綠色蔬果",
            "新鮮蘋果",
            "顆",
            dec("10"),
            "張大力",
            "賣相不佳",
        );
        assert_eq!(wrong_supplier, Err("Stock for supplier not found"));

        let ok = pos.record_return(
            date(2024, 3, 8),
            "有機農場",
            "新鮮蘋果",
            "顆",
            dec("10"),
            "張大力",
            "賣相不佳",
        );
        assert!(ok.is_ok());
        assert_eq!(pos.quantity_of("新鮮蘋果", "顆"), Some(dec("40")));
    }

    /// Returns price at the inventory unit price, not a caller-supplied one
    #[test]
    fn test_return_uses_inventory_price() {
        let mut pos = PosSim::new();
        pos.add_product("有機馬鈴薯", "公斤", dec("40"), dec("45"), "友善耕作");
        pos.record_return(
            date(2024, 3, 9),
            "友善耕作",
            "有機馬鈴薯",
            "公斤",
            dec("4"),
            "王小明",
            "受損",
        )
        .unwrap();

        let ret = pos.ledger().last().unwrap();
        assert_eq!(ret.unit_price, dec("45"));
        assert_eq!(ret.total_price, dec("180"));
        assert_eq!(ret.return_reason.as_deref(), Some("受損"));
    }

    /// Selling the full stock removes the row from later lookups
    #[test]
    fn test_full_sale_removes_row() {
        let mut pos = PosSim::new();
        pos.add_product("有機青菜", "把", dec("5"), dec("30"), "有機農場");
        pos.record_sale(
            date(2024, 3, 5),
            Shift::Night,
            "張大力",
            "有機青菜",
            "把",
            dec("5"),
            dec("30"),
        )
        .unwrap();
        assert_eq!(pos.quantity_of("有機青菜", "把"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// purchase(q) then sale(q') with q' <= q leaves exactly q - q'
        #[test]
        fn prop_purchase_minus_sale(
            purchased in quantity_strategy(),
            sold_fraction in 1u32..=100,
            price in price_strategy(),
        ) {
            let sold = purchased * Decimal::from(sold_fraction) / Decimal::from(100);
            let mut pos = PosSim::new();
            pos.record_purchase(
                date(2024, 3, 1), "有機農場", "甜玉米", "支", purchased, price, "王小明",
            ).unwrap();
            pos.record_sale(
                date(2024, 3, 2), Shift::Morning, "李小華", "甜玉米", "支", sold, price,
            ).unwrap();

            let remaining = purchased - sold;
            if remaining <= Decimal::ZERO {
                prop_assert_eq!(pos.quantity_of("甜玉米", "支"), None);
            } else {
                prop_assert_eq!(pos.quantity_of("甜玉米", "支"), Some(remaining));
            }
        }

        /// Ledger ids are strictly increasing across mixed operations
        #[test]
        fn prop_ledger_ids_strictly_increase(
            quantities in prop::collection::vec(quantity_strategy(), 1..15)
        ) {
            let mut pos = PosSim::new();
            for (i, quantity) in quantities.iter().enumerate() {
                let name = format!("產品{}", i);
                pos.record_purchase(
                    date(2024, 3, 1), "有機農場", &name, "個", *quantity, dec("10"), "王小明",
                ).unwrap();
                pos.record_sale(
                    date(2024, 3, 2), Shift::Afternoon, "李小華", &name, "個", *quantity, dec("12"),
                ).unwrap();
            }
            let ids: Vec<i64> = pos.ledger().iter().map(|t| t.transaction_id).collect();
            for pair in ids.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
        }

        /// The stored total is always quantity times the recorded unit price
        #[test]
        fn prop_ledger_totals(
            quantity in quantity_strategy(),
            price in price_strategy(),
        ) {
            let mut pos = PosSim::new();
            pos.record_purchase(
                date(2024, 3, 1), "有機農場", "甜玉米", "支", quantity, price, "王小明",
            ).unwrap();
            let row = pos.ledger().last().unwrap();
            prop_assert_eq!(row.total_price, quantity * price);
        }

        /// A failed sale never mutates the ledger or stock
        #[test]
        fn prop_failed_sale_is_a_no_op(
            stocked in quantity_strategy(),
            extra in quantity_strategy(),
        ) {
            let mut pos = PosSim::new();
            pos.add_product("甜玉米", "支", stocked, dec("12"), "友善耕作");
            let before_ledger = pos.ledger().len();

            let result = pos.record_sale(
                date(2024, 3, 2), Shift::Morning, "李小華", "甜玉米", "支",
                stocked + extra, dec("12"),
            );
            prop_assert!(result.is_err());
            prop_assert_eq!(pos.ledger().len(), before_ledger);
            prop_assert_eq!(pos.quantity_of("甜玉米", "支"), Some(stocked));
        }
    }
}
