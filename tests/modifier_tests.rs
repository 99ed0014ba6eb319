use rust_decimal_macros::dec;
use tarif::*;

fn eur(minor: i64) -> Money {
    Money::of_minor(minor, Currency::of("EUR").unwrap())
}

// ---------------------------------------------------------------------------
// Custom modifiers
// ---------------------------------------------------------------------------

/// Percentage reduction measured against the exclusive amount it is handed.
#[derive(Debug)]
struct PercentOff {
    modifier_type: String,
    percent: rust_decimal::Decimal,
}

impl PriceAmendable for PercentOff {
    fn modifier_type(&self) -> &str {
        &self.modifier_type
    }

    fn set_type(&mut self, modifier_type: &str) {
        self.modifier_type = modifier_type.to_string();
    }

    fn key(&self) -> Option<&str> {
        Some("percent-off")
    }

    fn apply(&self, build: &Money, ctx: &ApplyContext<'_>) -> Result<Option<Money>, PriceError> {
        let Some(exclusive) = ctx.exclusive else {
            return Ok(None);
        };
        let reduction = exclusive.multiplied_by(self.percent / dec!(100), ctx.rounding.exclusive)?;
        build.minus(&reduction).map(Some)
    }
}

impl FromArguments for PercentOff {
    fn from_arguments(args: &[Argument]) -> Result<Self, PriceError> {
        match args {
            [Argument::Decimal(percent)] => Ok(PercentOff {
                modifier_type: String::new(),
                percent: *percent,
            }),
            _ => Err(PriceError::InvalidModifier("expected a percentage".into())),
        }
    }
}

/// Post-VAT fee that carries VAT of its own.
#[derive(Debug)]
struct TaxedFee {
    modifier_type: String,
    minor: i64,
}

impl PriceAmendable for TaxedFee {
    fn modifier_type(&self) -> &str {
        &self.modifier_type
    }

    fn set_type(&mut self, modifier_type: &str) {
        self.modifier_type = modifier_type.to_string();
    }

    fn applies_after_vat(&self) -> bool {
        true
    }

    fn apply(&self, build: &Money, ctx: &ApplyContext<'_>) -> Result<Option<Money>, PriceError> {
        let fee = Money::of_minor(self.minor, build.currency());
        let vat = match ctx.vat {
            Some(vat) => vat.apply(&fee, ctx.rounding.vat)?,
            None => Money::zero(build.currency()),
        };
        build.plus(&fee)?.plus(&vat).map(Some)
    }
}

#[derive(Debug)]
struct Failing;

impl PriceAmendable for Failing {
    fn modifier_type(&self) -> &str {
        "failing"
    }

    fn set_type(&mut self, _modifier_type: &str) {}

    fn apply(&self, _build: &Money, _ctx: &ApplyContext<'_>) -> Result<Option<Money>, PriceError> {
        Err(PriceError::Modifier("lookup table unavailable".into()))
    }
}

// ---------------------------------------------------------------------------
// Modifier specs
// ---------------------------------------------------------------------------

#[test]
fn literal_specs() {
    let mut price = Price::of_minor(1000, "EUR").unwrap();
    price.add_tax(150).unwrap();
    price.add_tax(25_i64).unwrap();
    price.add_discount("-100").unwrap();
    price.add_discount(eur(-50)).unwrap();

    assert_eq!(price.inclusive(false).unwrap(), eur(1025));
    assert_eq!(price.taxes(false).unwrap(), eur(175));
    assert_eq!(price.discounts(false).unwrap(), eur(-150));
}

#[test]
fn invalid_specs_fail_immediately() {
    let mut price = Price::of_minor(1000, "EUR").unwrap();

    let err = price.add_tax("").unwrap_err();
    assert_eq!(
        err,
        PriceError::InvalidModifier("price modifier cannot be null or empty".into())
    );
    assert!(matches!(price.add_tax("ten"), Err(PriceError::InvalidModifier(_))));
    assert!(matches!(
        price.add_tax(None::<Modifier>),
        Err(PriceError::InvalidModifier(_))
    ));

    // nothing was registered
    assert!(price.modifications(false, None).unwrap().is_empty());
}

#[test]
fn builder_closure_configures_fresh_modifier() {
    let mut price = Price::of_minor(1000, "EUR").unwrap();
    price.set_units(3).unwrap();
    price
        .add_discount(ModifierSpec::configure(|m| {
            m.with_key("bulk").with_per_unit(false).subtract(300)
        }))
        .unwrap();

    let ledger = price.modifications(false, None).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].modifier_type(), "discount");
    assert_eq!(ledger[0].key(), Some("bulk"));
    assert_eq!(ledger[0].amount(), &eur(-300));
    assert_eq!(price.inclusive(false).unwrap(), eur(2700));
}

#[test]
fn instance_is_retyped() {
    let mut price = Price::of_minor(1000, "EUR").unwrap();
    price
        .add_modifier("promo", Modifier::new().with_type("ignored").subtract(100))
        .unwrap();

    let ledger = price.modifications(false, Some("promo")).unwrap();
    assert_eq!(ledger.len(), 1);
    assert!(price.modifications(false, Some("ignored")).unwrap().is_empty());
}

#[test]
fn custom_amendable_and_factory() {
    let mut price = Price::of_minor(2000, "EUR").unwrap();
    price
        .add_discount(ModifierSpec::amendable(PercentOff {
            modifier_type: "whatever".into(),
            percent: dec!(10),
        }))
        .unwrap();
    assert_eq!(price.inclusive(false).unwrap(), eur(1800));

    price
        .add_discount(ModifierSpec::factory::<PercentOff>(vec![Argument::Decimal(dec!(50))]))
        .unwrap();
    // measured against the running amount of 18.00
    assert_eq!(price.inclusive(false).unwrap(), eur(900));

    let ledger = price.discounts(false).unwrap();
    assert_eq!(ledger, eur(-1100));
}

#[test]
fn factory_with_bad_arguments_is_rejected_at_registration() {
    let mut price = Price::of_minor(2000, "EUR").unwrap();
    let err = price
        .add_discount(ModifierFactory::of::<PercentOff>(vec![Argument::Flag(true)]))
        .unwrap_err();
    assert!(matches!(err, PriceError::InvalidModifier(msg) if msg.contains("PercentOff")));
}

#[test]
fn price_as_spec_adds_its_inclusive_total() {
    let shipping = Price::of_minor(500, "EUR").unwrap().with_vat(20).unwrap();
    let mut price = Price::of_minor(1000, "EUR").unwrap();
    price.add_modifier("shipping", &shipping).unwrap();
    assert_eq!(price.inclusive(false).unwrap(), eur(1600));
}

// ---------------------------------------------------------------------------
// Post-VAT modifiers
// ---------------------------------------------------------------------------

#[test]
fn post_vat_modifier_is_not_taxed() {
    let mut price = Price::of_minor(1000, "EUR").unwrap().with_vat(20).unwrap();
    price
        .add_modifier(
            "deposit",
            Modifier::new().with_post_vat(true).with_per_unit(false).add(500),
        )
        .unwrap();

    assert_eq!(price.exclusive(false, false).unwrap(), eur(1000));
    assert_eq!(price.exclusive(false, true).unwrap(), eur(1500));
    assert_eq!(price.vat().money(false).unwrap(), eur(200));
    assert_eq!(price.inclusive(false).unwrap(), eur(1700));

    let ledger = price.modifications(false, None).unwrap();
    assert!(ledger[0].post());
}

#[test]
fn post_vat_modifier_sees_vat() {
    let mut price = Price::of_minor(1000, "EUR").unwrap().with_vat(20).unwrap();
    price
        .add_modifier(
            "fee",
            ModifierSpec::amendable(TaxedFee {
                modifier_type: String::new(),
                minor: 500,
            }),
        )
        .unwrap();

    assert_eq!(price.inclusive(false).unwrap(), eur(1800));
    assert_eq!(price.modifiers(false, Some("fee")).unwrap(), eur(600));
}

#[test]
fn post_vat_per_unit_scaling() {
    let mut price = Price::of_minor(1000, "EUR").unwrap();
    price.set_units(2).unwrap().set_vat(10).unwrap();
    price
        .add_modifier("deposit", Modifier::new().with_post_vat(true).add(25))
        .unwrap();

    assert_eq!(price.inclusive(false).unwrap(), eur(2250));
    assert_eq!(price.inclusive(true).unwrap(), eur(1125));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn modifier_errors_propagate() {
    let mut price = Price::of_minor(1000, "EUR").unwrap();
    price.add_tax(100).unwrap();
    price
        .add_modifier("custom", ModifierSpec::amendable(Failing))
        .unwrap();

    let err = price.inclusive(false).unwrap_err();
    assert_eq!(err, PriceError::Modifier("lookup table unavailable".into()));
    // no partial result is cached
    assert!(price.exclusive(false, false).is_err());
    assert!(price.modifications(false, None).is_err());
}

#[test]
fn currency_mismatch_inside_modifier() {
    let mut price = Price::of_minor(1000, "EUR").unwrap();
    price
        .add_tax(Money::of_minor(100, Currency::of("USD").unwrap()))
        .unwrap();
    assert!(matches!(
        price.inclusive(false),
        Err(PriceError::CurrencyMismatch { .. })
    ));
}
