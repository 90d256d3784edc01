//! Multi-dimensional resource vectors and their epsilon-tolerant algebra.
//!
//! A [`Resource`] carries milli-cpu, memory in bytes, and any number of scalar
//! (extended) resources scaled to milli-units. Comparisons absorb differences
//! below a per-dimension threshold, so `==` is deliberately not transitive and
//! the type does not implement `PartialOrd`: [`Resource::less`] is a
//! conservative fit heuristic, not an order.
//!
//! ```
//! use gang_scheduler_core::core::Resource;
//!
//! let a = Resource::from_resource_list([("cpu", "100m")]);
//! let b = Resource::from_resource_list([("cpu", "109m")]);
//! assert_eq!(a, b);
//! assert!(a.less_equal(&b));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::core::resource_names::is_scalar_resource_name;
use crate::core::{Quantity, ResourceError};

/// Smallest cpu difference, in milli-cpu, that comparisons notice.
pub const MIN_MILLI_CPU: i64 = 10;
/// Smallest scalar resource difference, in milli-units, that comparisons notice.
pub const MIN_MILLI_SCALAR_RESOURCES: i64 = 10;
/// Smallest memory difference, in bytes, that comparisons notice.
pub const MIN_MEMORY: i64 = 10 * 1024 * 1024;

/// Name of the cpu dimension.
pub const CPU: &str = "cpu";
/// Name of the memory dimension.
pub const MEMORY: &str = "memory";
/// Name of the entry that caps the number of tasks on a node.
pub const PODS: &str = "pods";

/// A vector of resource quantities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    /// Cpu in milli-cpu.
    pub milli_cpu: Quantity,
    /// Memory in bytes.
    pub memory: Quantity,
    /// Extended resources keyed by name, in milli-units.
    pub scalar_resources: BTreeMap<String, Quantity>,
    /// Task cap derived from a `pods` entry.
    pub max_task_num: Option<i64>,
}

impl Resource {
    /// An empty resource vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from raw name/quantity-string pairs.
    ///
    /// Empty values and names that are not cpu, memory, `pods` or a scalar
    /// resource name are skipped. Unparseable quantities are skipped with a
    /// warning; use [`Resource::try_from_resource_list`] to reject them.
    pub fn from_resource_list<I, K, V>(list: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut resource = Self::new();
        for (name, value) in list {
            let (name, value) = (name.as_ref(), value.as_ref());
            if let Err(err) = resource.accumulate(name, value) {
                tracing::warn!("skipping resource {name}: {err}");
            }
        }
        resource
    }

    /// Like [`Resource::from_resource_list`] but fails on the first
    /// unparseable quantity.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidQuantity`] for malformed values.
    pub fn try_from_resource_list<I, K, V>(list: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut resource = Self::new();
        for (name, value) in list {
            resource.accumulate(name.as_ref(), value.as_ref())?;
        }
        Ok(resource)
    }

    fn accumulate(&mut self, name: &str, value: &str) -> Result<(), ResourceError> {
        if value.is_empty() {
            return Ok(());
        }

        match name {
            CPU => self.milli_cpu = add_milli(self.milli_cpu, value)?,
            MEMORY => {
                self.memory = self
                    .memory
                    .checked_add(Quantity::parse(value)?)
                    .ok_or_else(|| ResourceError::InvalidQuantity(value.to_string()))?;
            }
            PODS => self.max_task_num = Quantity::parse(value)?.to_i64(),
            _ if is_scalar_resource_name(name) => {
                let current = self.scalar(name);
                let scaled = add_milli(current, value)?;
                self.scalar_resources.insert(name.to_string(), scaled);
            }
            _ => {}
        }
        Ok(())
    }

    /// Names of every tracked dimension: cpu, memory, then scalars.
    #[must_use]
    pub fn resource_names(&self) -> Vec<String> {
        [CPU.to_string(), MEMORY.to_string()]
            .into_iter()
            .chain(self.scalar_resources.keys().cloned())
            .collect()
    }

    /// Quantity of the named dimension.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResource`] for untracked scalar names.
    pub fn get(&self, name: &str) -> Result<Quantity, ResourceError> {
        match name {
            CPU => Ok(self.milli_cpu),
            MEMORY => Ok(self.memory),
            _ => self
                .scalar_resources
                .get(name)
                .copied()
                .ok_or_else(|| ResourceError::UnknownResource(name.to_string())),
        }
    }

    /// Set a scalar dimension, replacing any previous value.
    pub fn set_scalar_resource(&mut self, name: impl Into<String>, quantity: Quantity) {
        self.scalar_resources.insert(name.into(), quantity);
    }

    fn scalar(&self, name: &str) -> Quantity {
        self.scalar_resources.get(name).copied().unwrap_or_default()
    }

    /// True if every dimension is below its minimum threshold.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        if self.milli_cpu >= Quantity::from(MIN_MILLI_CPU) || self.memory >= Quantity::from(MIN_MEMORY) {
            return false;
        }

        let min_scalar = Quantity::from(MIN_MILLI_SCALAR_RESOURCES);
        self.scalar_resources.values().all(|quant| *quant < min_scalar)
    }

    /// True if the named dimension is below its minimum threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResource`] for untracked scalar names.
    pub fn is_zero(&self, name: &str) -> Result<bool, ResourceError> {
        match name {
            CPU => Ok(self.milli_cpu < Quantity::from(MIN_MILLI_CPU)),
            MEMORY => Ok(self.memory < Quantity::from(MIN_MEMORY)),
            _ => self
                .scalar_resources
                .get(name)
                .map(|quant| *quant < Quantity::from(MIN_MILLI_SCALAR_RESOURCES))
                .ok_or_else(|| ResourceError::UnknownResource(name.to_string())),
        }
    }

    /// Raise every dimension to at least the value in `other`.
    pub fn set_max_resource(&mut self, other: &Self) -> &mut Self {
        self.milli_cpu = self.milli_cpu.max(other.milli_cpu);
        self.memory = self.memory.max(other.memory);

        for (name, other_quant) in &other.scalar_resources {
            let quant = self.scalar_resources.entry(name.clone()).or_default();
            *quant = (*quant).max(*other_quant);
        }
        self
    }

    /// Remove what `other` requests plus one threshold of headroom from each
    /// requested dimension. The result may go negative; a negative dimension
    /// tells the caller by how much the request does not fit.
    pub fn fit_delta(&mut self, other: &Self) -> &mut Self {
        if other.milli_cpu.is_positive() {
            self.milli_cpu -= other.milli_cpu + Quantity::from(MIN_MILLI_CPU);
        }

        if other.memory.is_positive() {
            self.memory -= other.memory + Quantity::from(MIN_MEMORY);
        }

        for (name, other_quant) in &other.scalar_resources {
            if other_quant.is_positive() {
                *self.scalar_resources.entry(name.clone()).or_default() -=
                    *other_quant + Quantity::from(MIN_MILLI_SCALAR_RESOURCES);
            }
        }
        self
    }

    /// Split the difference to `other` into `(increase, decrease)`: each
    /// dimension of `self` lands in `increase` when it is larger than in
    /// `other` and in `decrease` otherwise.
    #[must_use]
    pub fn diff(&self, other: &Self) -> (Self, Self) {
        let mut increase = Self::new();
        let mut decrease = Self::new();

        let side = |grew: bool| if grew { 0 } else { 1 };
        let sides = [&mut increase, &mut decrease];

        sides[side(self.milli_cpu > other.milli_cpu)].milli_cpu += (self.milli_cpu - other.milli_cpu).abs();
        sides[side(self.memory > other.memory)].memory += (self.memory - other.memory).abs();

        for (name, quant) in &self.scalar_resources {
            let other_quant = other.scalar(name);
            *sides[side(*quant > other_quant)]
                .scalar_resources
                .entry(name.clone())
                .or_default() += (*quant - other_quant).abs();
        }

        (increase, decrease)
    }

    /// Exact `<=` on every dimension; every scalar of `self` must also be
    /// present in `other`.
    #[must_use]
    pub fn less_equal_strict(&self, other: &Self) -> bool {
        if self.milli_cpu > other.milli_cpu || self.memory > other.memory {
            return false;
        }

        self.scalar_resources.iter().all(|(name, quant)| {
            other
                .scalar_resources
                .get(name)
                .is_some_and(|other_quant| quant <= other_quant)
        })
    }

    /// Exact `>=` on every dimension, see [`Resource::less_equal_strict`].
    #[must_use]
    pub fn greater_equal_strict(&self, other: &Self) -> bool {
        other.less_equal_strict(self)
    }

    /// Conservative "fits below" heuristic used for tie-breaking.
    ///
    /// False whenever cpu or memory of `self` exceeds `other`. Among the
    /// remaining cases a `self` without scalar resources is less than
    /// anything, and a `self` with scalar resources is never less than an
    /// `other` without any.
    #[must_use]
    pub fn less(&self, other: &Self) -> bool {
        if self.milli_cpu > other.milli_cpu || self.memory > other.memory {
            return false;
        }

        if self.scalar_resources.is_empty() {
            return true;
        }

        if other.scalar_resources.is_empty() {
            return false;
        }

        self.scalar_resources
            .iter()
            .all(|(name, quant)| *quant <= other.scalar(name))
    }

    /// `self == other || self.less(other)`.
    #[must_use]
    pub fn less_equal(&self, other: &Self) -> bool {
        self == other || self.less(other)
    }

    /// `other.less_equal(self)`.
    #[must_use]
    pub fn greater_equal(&self, other: &Self) -> bool {
        other.less_equal(self)
    }

    /// Subtract `other`, refusing to take more than is available.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InsufficientResource`] unless
    /// `self.greater_equal(other)`.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, ResourceError> {
        if !self.greater_equal(other) {
            return Err(ResourceError::InsufficientResource {
                available: self.to_string(),
                requested: other.to_string(),
            });
        }

        let mut resource = self.clone();
        resource.sub_unchecked(other);
        Ok(resource)
    }

    /// Add `other`, or `None` if any dimension overflows.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let mut resource = self.clone();
        resource.milli_cpu = resource.milli_cpu.checked_add(other.milli_cpu)?;
        resource.memory = resource.memory.checked_add(other.memory)?;
        for (name, quant) in &other.scalar_resources {
            let sum = resource.scalar(name).checked_add(*quant)?;
            resource.scalar_resources.insert(name.clone(), sum);
        }
        Some(resource)
    }

    fn sub_unchecked(&mut self, other: &Self) {
        self.milli_cpu -= other.milli_cpu;
        self.memory -= other.memory;

        for (name, quant) in &other.scalar_resources {
            *self.scalar_resources.entry(name.clone()).or_default() -= *quant;
        }
    }
}

/// `current + value * 1000`, rejecting values whose milli form overflows.
fn add_milli(current: Quantity, value: &str) -> Result<Quantity, ResourceError> {
    Quantity::parse(value)?
        .checked_mul(Quantity::from(1000_i64))
        .and_then(|milli| current.checked_add(milli))
        .ok_or_else(|| ResourceError::InvalidQuantity(value.to_string()))
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        if (self.milli_cpu - other.milli_cpu).abs() >= Quantity::from(MIN_MILLI_CPU) {
            return false;
        }

        if (self.memory - other.memory).abs() >= Quantity::from(MIN_MEMORY) {
            return false;
        }

        let min_scalar = Quantity::from(MIN_MILLI_SCALAR_RESOURCES);
        for (name, quant) in &self.scalar_resources {
            let differs = match other.scalar_resources.get(name) {
                Some(other_quant) => (*quant - *other_quant).abs() >= min_scalar,
                None => *quant >= min_scalar,
            };
            if differs {
                return false;
            }
        }

        other
            .scalar_resources
            .iter()
            .filter(|(name, _)| !self.scalar_resources.contains_key(*name))
            .all(|(_, quant)| *quant < min_scalar)
    }
}

impl AddAssign<&Resource> for Resource {
    fn add_assign(&mut self, rhs: &Resource) {
        self.milli_cpu += rhs.milli_cpu;
        self.memory += rhs.memory;

        for (name, quant) in &rhs.scalar_resources {
            *self.scalar_resources.entry(name.clone()).or_default() += *quant;
        }
    }
}

impl Add<&Resource> for &Resource {
    type Output = Resource;

    fn add(self, rhs: &Resource) -> Resource {
        let mut resource = self.clone();
        resource += rhs;
        resource
    }
}

impl Add for Resource {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += &rhs;
        self
    }
}

/// # Panics
///
/// Subtracting more than is available is a contract violation: callers check
/// with [`Resource::less_equal`] first, or use [`Resource::checked_sub`].
impl SubAssign<&Resource> for Resource {
    fn sub_assign(&mut self, rhs: &Resource) {
        assert!(
            self.greater_equal(rhs),
            "resource is not sufficient to do operation: <{self}> sub <{rhs}>"
        );
        self.sub_unchecked(rhs);
    }
}

impl Sub<&Resource> for &Resource {
    type Output = Resource;

    fn sub(self, rhs: &Resource) -> Resource {
        let mut resource = self.clone();
        resource -= rhs;
        resource
    }
}

impl Sub for Resource {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= &rhs;
        self
    }
}

impl Mul<i64> for &Resource {
    type Output = Resource;

    fn mul(self, ratio: i64) -> Resource {
        let mut resource = self.clone();
        resource.milli_cpu *= ratio;
        resource.memory *= ratio;
        for quant in resource.scalar_resources.values_mut() {
            *quant *= ratio;
        }
        resource
    }
}

impl Mul<i64> for Resource {
    type Output = Self;

    fn mul(self, ratio: i64) -> Self {
        &self * ratio
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cpu {}, memory {}",
            self.milli_cpu.format_scaled(3),
            self.memory.format_scaled(0)
        )?;
        for (name, quant) in &self.scalar_resources {
            write!(f, ", {name} {}", quant.format_scaled(0))?;
        }
        Ok(())
    }
}
