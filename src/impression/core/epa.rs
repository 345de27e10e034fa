//! EPA sentiment primitives: triples, event roles, axes, and fundamentals.
//!
//! Purpose
//! -------
//! Provide the small value types every other part of the engine is built
//! from: the Evaluation/Potency/Activity triple [`Epa`], the event roles
//! [`Role`] (Actor, Behavior, Object, Setting), the sentiment axes [`Axis`],
//! and [`Fundamentals`], the culturally rated profile of one event.
//!
//! Invariants & assumptions
//! ------------------------
//! - EPA values are unconstrained reals. Survey instruments conventionally
//!   produce values in `[-4.3, 4.3]`, but nothing here enforces that range.
//! - An event always has an Actor, a Behavior, and an Object; the Setting is
//!   optional.
//!
//! Conventions
//! -----------
//! - Canonical participant order is Actor, Behavior, Object, Setting, and
//!   the flat vector layout is `Ae Ap Aa Be Bp Ba Oe Op Oa [Se Sp Sa]`.
//! - The flat index of `(role, axis)` is `3 * role.index() + axis.index()`.
use std::fmt;

use ndarray::Array1;

use crate::impression::errors::{ActError, ActResult};

/// Number of sentiment axes per element.
pub const EPA_DIM: usize = 3;

/// One Evaluation/Potency/Activity rating.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Epa {
    pub e: f64,
    pub p: f64,
    pub a: f64,
}

impl Epa {
    pub const fn new(e: f64, p: f64, a: f64) -> Self {
        Epa { e, p, a }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Evaluation => self.e,
            Axis::Potency => self.p,
            Axis::Activity => self.a,
        }
    }

    pub fn to_array(self) -> [f64; EPA_DIM] {
        [self.e, self.p, self.a]
    }
}

impl From<[f64; EPA_DIM]> for Epa {
    fn from(v: [f64; EPA_DIM]) -> Self {
        Epa::new(v[0], v[1], v[2])
    }
}

/// Participant role within a social event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Actor,
    Behavior,
    Object,
    Setting,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Actor, Role::Behavior, Role::Object, Role::Setting];
    pub const VALID: &'static [&'static str] = &["Actor", "Behavior", "Object", "Setting"];

    /// Position of the role in canonical participant order.
    pub fn index(self) -> usize {
        match self {
            Role::Actor => 0,
            Role::Behavior => 1,
            Role::Object => 2,
            Role::Setting => 3,
        }
    }

    /// Single-letter code used in term labels and equation names.
    pub fn letter(self) -> char {
        match self {
            Role::Actor => 'A',
            Role::Behavior => 'B',
            Role::Object => 'O',
            Role::Setting => 'S',
        }
    }

    pub fn from_letter(c: char) -> Option<Role> {
        match c {
            'A' => Some(Role::Actor),
            'B' => Some(Role::Behavior),
            'O' => Some(Role::Object),
            'S' => Some(Role::Setting),
            _ => None,
        }
    }

    pub fn from_index(i: usize) -> Option<Role> {
        Role::ALL.get(i).copied()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Actor => "Actor",
            Role::Behavior => "Behavior",
            Role::Object => "Object",
            Role::Setting => "Setting",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Role {
    type Err = ActError;

    fn from_str(s: &str) -> ActResult<Self> {
        match s {
            "Actor" | "actor" | "A" => Ok(Role::Actor),
            "Behavior" | "behavior" | "B" => Ok(Role::Behavior),
            "Object" | "object" | "O" => Ok(Role::Object),
            "Setting" | "setting" | "S" => Ok(Role::Setting),
            other => Err(ActError::InvalidRole { name: other.to_string(), valid: Role::VALID }),
        }
    }
}

/// Sentiment axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Evaluation,
    Potency,
    Activity,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Evaluation, Axis::Potency, Axis::Activity];

    pub fn index(self) -> usize {
        match self {
            Axis::Evaluation => 0,
            Axis::Potency => 1,
            Axis::Activity => 2,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Axis::Evaluation => 'e',
            Axis::Potency => 'p',
            Axis::Activity => 'a',
        }
    }

    pub fn from_letter(c: char) -> Option<Axis> {
        match c {
            'e' => Some(Axis::Evaluation),
            'p' => Some(Axis::Potency),
            'a' => Some(Axis::Activity),
            _ => None,
        }
    }
}

/// `Fundamentals` — culturally rated EPA profile of one event.
///
/// Purpose
/// -------
/// Hold the fundamental sentiments of the Actor, Behavior, Object, and
/// optional Setting of an event, and flatten them into the canonical
/// fundamental vector `f`.
///
/// Fields
/// ------
/// - `actor`, `behavior`, `object`: [`Epa`]
///   Required participants.
/// - `setting`: `Option<Epa>`
///   Present only for settings-aware equations; adds three coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fundamentals {
    pub actor: Epa,
    pub behavior: Epa,
    pub object: Epa,
    pub setting: Option<Epa>,
}

impl Fundamentals {
    pub fn new(actor: Epa, behavior: Epa, object: Epa) -> Self {
        Fundamentals { actor, behavior, object, setting: None }
    }

    pub fn with_setting(mut self, setting: Epa) -> Self {
        self.setting = Some(setting);
        self
    }

    /// Build fundamentals from a flat `Ae Ap Aa Be Bp Ba Oe Op Oa [Se Sp Sa]`
    /// slice.
    ///
    /// # Errors
    /// - [`ActError::DimensionError`] if the slice length is neither 9 nor 12.
    pub fn from_slice(values: &[f64]) -> ActResult<Self> {
        if values.len() != 3 * EPA_DIM && values.len() != 4 * EPA_DIM {
            return Err(ActError::DimensionError {
                what: "flat fundamentals",
                expected: 3 * EPA_DIM,
                found: values.len(),
            });
        }
        let triple = |r: usize| Epa::new(values[3 * r], values[3 * r + 1], values[3 * r + 2]);
        let mut out = Fundamentals::new(triple(0), triple(1), triple(2));
        if values.len() == 4 * EPA_DIM {
            out.setting = Some(triple(3));
        }
        Ok(out)
    }

    /// Number of participants (3 or 4).
    pub fn participants(&self) -> usize {
        if self.setting.is_some() { 4 } else { 3 }
    }

    /// Length `n` of the flat fundamental vector.
    pub fn len(&self) -> usize {
        self.participants() * EPA_DIM
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, role: Role) -> Option<Epa> {
        match role {
            Role::Actor => Some(self.actor),
            Role::Behavior => Some(self.behavior),
            Role::Object => Some(self.object),
            Role::Setting => self.setting,
        }
    }

    /// Return a copy with the element at `role` replaced.
    ///
    /// # Errors
    /// - [`ActError::MissingRole`] when replacing the Setting of an event
    ///   that has none.
    pub fn replace(&self, role: Role, epa: Epa) -> ActResult<Self> {
        let mut out = *self;
        match role {
            Role::Actor => out.actor = epa,
            Role::Behavior => out.behavior = epa,
            Role::Object => out.object = epa,
            Role::Setting => {
                if out.setting.is_none() {
                    return Err(ActError::MissingRole { role });
                }
                out.setting = Some(epa);
            }
        }
        Ok(out)
    }

    /// Flatten into the canonical fundamental vector `f`.
    pub fn to_vector(&self) -> Array1<f64> {
        let mut v = Vec::with_capacity(self.len());
        for role in Role::ALL.iter().take(self.participants()) {
            if let Some(epa) = self.get(*role) {
                v.extend_from_slice(&epa.to_array());
            }
        }
        Array1::from(v)
    }
}
