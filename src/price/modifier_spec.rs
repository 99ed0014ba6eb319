use std::fmt;
use std::rc::Rc;

use rust_decimal::Decimal;

use super::amendable::PriceAmendable;
use super::modifier::{Modifier, Operand};
use super::price::Price;
use crate::core::{Money, PriceError};

/// Everything [`Price::add_modifier`] accepts, resolved into a concrete
/// modifier when it is added.
pub enum ModifierSpec {
    /// A single "add" step with this amount.
    Literal(Operand),
    /// Receives a fresh [`Modifier`] (already typed) and returns it configured.
    Builder(Box<dyn FnOnce(Modifier) -> Modifier>),
    /// A ready-made modifier; only its type is overwritten.
    Instance(Box<dyn PriceAmendable>),
    /// A modifier type constructed from arguments.
    Factory(ModifierFactory),
}

impl ModifierSpec {
    /// Configure a fresh modifier with a closure.
    pub fn configure(configure: impl FnOnce(Modifier) -> Modifier + 'static) -> Self {
        Self::Builder(Box::new(configure))
    }

    /// Wrap a custom [`PriceAmendable`] implementation.
    pub fn amendable(modifier: impl PriceAmendable + 'static) -> Self {
        Self::Instance(Box::new(modifier))
    }

    /// Construct `T` from `args` when the modifier is added.
    pub fn factory<T: FromArguments>(args: Vec<Argument>) -> Self {
        Self::Factory(ModifierFactory::of::<T>(args))
    }

    /// Use another price's inclusive total as an "add" amount.
    pub fn from_price(price: &Price) -> Result<Self, PriceError> {
        Ok(Self::Literal(Operand::Money(price.inclusive(false)?)))
    }

    pub(crate) fn resolve(self, modifier_type: &str) -> Result<Rc<dyn PriceAmendable>, PriceError> {
        let resolved: Box<dyn PriceAmendable> = match self {
            Self::Literal(operand) => Box::new(Modifier::new().with_type(modifier_type).add(operand)),
            Self::Builder(configure) => Box::new(configure(Modifier::new().with_type(modifier_type))),
            Self::Instance(mut modifier) => {
                modifier.set_type(modifier_type);
                modifier
            }
            Self::Factory(factory) => {
                let mut modifier = factory.instantiate()?;
                modifier.set_type(modifier_type);
                modifier
            }
        };
        Ok(Rc::from(resolved))
    }
}

impl fmt::Debug for ModifierSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(operand) => f.debug_tuple("Literal").field(operand).finish(),
            Self::Builder(_) => f.write_str("Builder(..)"),
            Self::Instance(modifier) => f.debug_tuple("Instance").field(modifier).finish(),
            Self::Factory(factory) => f.debug_tuple("Factory").field(factory).finish(),
        }
    }
}

/// Constructor argument for a [`ModifierFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Money(Money),
    Minor(i64),
    Decimal(Decimal),
    Text(String),
    Flag(bool),
}

/// Modifier types that can be built from a list of arguments.
pub trait FromArguments: PriceAmendable + Sized + 'static {
    fn from_arguments(args: &[Argument]) -> Result<Self, PriceError>;
}

type Constructor = fn(&[Argument]) -> Result<Box<dyn PriceAmendable>, PriceError>;

/// A deferred modifier construction: a type plus the arguments to build it with.
#[derive(Clone)]
pub struct ModifierFactory {
    name: &'static str,
    args: Vec<Argument>,
    constructor: Constructor,
}

fn construct<T: FromArguments>(args: &[Argument]) -> Result<Box<dyn PriceAmendable>, PriceError> {
    Ok(Box::new(T::from_arguments(args)?))
}

impl ModifierFactory {
    pub fn of<T: FromArguments>(args: Vec<Argument>) -> Self {
        Self {
            name: std::any::type_name::<T>(),
            args,
            constructor: construct::<T>,
        }
    }

    /// Name of the type this factory builds.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn instantiate(&self) -> Result<Box<dyn PriceAmendable>, PriceError> {
        (self.constructor)(&self.args).map_err(|err| {
            PriceError::InvalidModifier(format!("cannot instantiate {}: {err}", self.name))
        })
    }
}

impl fmt::Debug for ModifierFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifierFactory")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

/// Conversion into a [`ModifierSpec`], failing on input that cannot be a modifier.
pub trait IntoModifierSpec {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError>;
}

impl IntoModifierSpec for ModifierSpec {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError> {
        Ok(self)
    }
}

impl IntoModifierSpec for Modifier {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError> {
        Ok(ModifierSpec::Instance(Box::new(self)))
    }
}

impl IntoModifierSpec for ModifierFactory {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError> {
        Ok(ModifierSpec::Factory(self))
    }
}

impl IntoModifierSpec for Operand {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError> {
        Ok(ModifierSpec::Literal(self))
    }
}

impl IntoModifierSpec for Money {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError> {
        Ok(ModifierSpec::Literal(Operand::Money(self)))
    }
}

impl IntoModifierSpec for i64 {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError> {
        Ok(ModifierSpec::Literal(Operand::Minor(self)))
    }
}

impl IntoModifierSpec for i32 {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError> {
        Ok(ModifierSpec::Literal(Operand::Minor(i64::from(self))))
    }
}

impl IntoModifierSpec for &str {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError> {
        Operand::parse(self).map(ModifierSpec::Literal)
    }
}

impl IntoModifierSpec for &Price {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError> {
        ModifierSpec::from_price(self)
    }
}

impl<T: IntoModifierSpec> IntoModifierSpec for Option<T> {
    fn into_modifier_spec(self) -> Result<ModifierSpec, PriceError> {
        self.ok_or_else(|| PriceError::InvalidModifier("price modifier cannot be null or empty".into()))?
            .into_modifier_spec()
    }
}
