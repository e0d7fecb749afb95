//! Scalar multiplication algorithms, split by the time-constancy they
//! provide: [`variable_base`] is safe to use with secret scalars,
//! [`vartime_double_base`] is not and exists only for signature
//! verification, where both inputs are public.

pub mod variable_base;
pub mod vartime_double_base;
