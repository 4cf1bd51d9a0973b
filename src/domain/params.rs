//! Call parameters and their coercion to ABI values
//!
//! Callers pass loosely-typed values (strings, numbers, nested lists). They are
//! matched against the input types of the ABI function being invoked and turned
//! into [`DynSolValue`]s; anything that does not fit is reported with the
//! argument position and expected type.

use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, U256};

use crate::error::{Result, WalletError};

/// A single call parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Textual value: address, decimal/hex integer, hex bytes, bool or string
    Str(String),
    /// Integer value
    Num(i128),
    Bool(bool),
    /// Array, fixed array or tuple, element by element
    List(Vec<Param>),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Str(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Str(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<Address> for Param {
    fn from(value: Address) -> Self {
        Param::Str(value.to_string())
    }
}

impl From<U256> for Param {
    fn from(value: U256) -> Self {
        Param::Str(value.to_string())
    }
}

macro_rules! impl_param_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Param {
            fn from(value: $ty) -> Self {
                Param::Num(i128::from(value))
            }
        })*
    };
}

impl_param_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl<T: Into<Param>> From<Vec<T>> for Param {
    fn from(values: Vec<T>) -> Self {
        Param::List(values.into_iter().map(Into::into).collect())
    }
}

/// Pick the overload of `method` that takes `arity` arguments
pub fn select_function<'a>(abi: &'a JsonAbi, method: &str, arity: usize) -> Result<&'a Function> {
    let overloads = abi
        .function(method)
        .filter(|overloads| !overloads.is_empty())
        .ok_or_else(|| WalletError::UnknownMethod {
            method: method.to_string(),
        })?;

    overloads
        .iter()
        .find(|function| function.inputs.len() == arity)
        .ok_or_else(|| WalletError::ArgumentCount {
            method: method.to_string(),
            expected: overloads.iter().map(|f| f.inputs.len()).collect(),
            got: arity,
        })
}

/// Coerce `params` into ABI values for `function`'s inputs
pub fn coerce_args(function: &Function, params: &[Param]) -> Result<Vec<DynSolValue>> {
    if function.inputs.len() != params.len() {
        return Err(WalletError::ArgumentCount {
            method: function.name.clone(),
            expected: vec![function.inputs.len()],
            got: params.len(),
        });
    }

    let mut values = Vec::with_capacity(params.len());
    for (index, (input, param)) in function.inputs.iter().zip(params).enumerate() {
        let invalid = |reason: String| WalletError::InvalidParam {
            method: function.name.clone(),
            index,
            kind: input.ty.clone(),
            reason,
        };
        let ty: DynSolType = input.resolve().map_err(|e| invalid(e.to_string()))?;
        values.push(coerce_param(&ty, param).map_err(invalid)?);
    }
    Ok(values)
}

/// Coerce a single parameter to `ty`
fn coerce_param(ty: &DynSolType, param: &Param) -> Result<DynSolValue, String> {
    match (ty, param) {
        (DynSolType::String, Param::Str(s)) => Ok(DynSolValue::String(s.clone())),
        (_, Param::Str(s)) => ty.coerce_str(s).map_err(|e| e.to_string()),
        (DynSolType::Bool, Param::Bool(b)) => Ok(DynSolValue::Bool(*b)),
        (DynSolType::Bool, Param::Num(n)) => match n {
            0 => Ok(DynSolValue::Bool(false)),
            1 => Ok(DynSolValue::Bool(true)),
            _ => Err(format!("expected 0 or 1 for bool, got {n}")),
        },
        (DynSolType::Uint(_) | DynSolType::Int(_), Param::Num(n)) => {
            ty.coerce_str(&n.to_string()).map_err(|e| e.to_string())
        }
        (DynSolType::String, Param::Num(n)) => Ok(DynSolValue::String(n.to_string())),
        (DynSolType::Array(inner), Param::List(items)) => items
            .iter()
            .map(|item| coerce_param(inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, size), Param::List(items)) => {
            if items.len() != *size {
                return Err(format!(
                    "fixed array size mismatch: expected {size} elements, got {}",
                    items.len()
                ));
            }
            items
                .iter()
                .map(|item| coerce_param(inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::FixedArray)
        }
        (DynSolType::Tuple(types), Param::List(items)) => {
            if items.len() != types.len() {
                return Err(format!(
                    "tuple size mismatch: expected {} elements, got {}",
                    types.len(),
                    items.len()
                ));
            }
            types
                .iter()
                .zip(items)
                .map(|(ty, item)| coerce_param(ty, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Tuple)
        }
        (_, other) => Err(format!("cannot use {other:?} as {}", ty.sol_type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn erc20() -> JsonAbi {
        JsonAbi::parse([
            "function transfer(address to, uint256 amount) returns (bool)",
            "function balanceOf(address owner) view returns (uint256)",
            "function batch(address[] to, uint256[2] amounts)",
            "function safeTransferFrom(address from, address to, uint256 id)",
            "function safeTransferFrom(address from, address to, uint256 id, bytes data)",
        ])
        .unwrap()
    }

    #[test]
    fn test_coerce_transfer() {
        let abi = erc20();
        let function = select_function(&abi, "transfer", 2).unwrap();
        let values = coerce_args(
            function,
            &[
                "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0".into(),
                Param::Num(100),
            ],
        )
        .unwrap();

        assert_eq!(values.len(), 2);
        assert!(values[0].as_address().is_some());
        assert_eq!(values[1], DynSolValue::Uint(U256::from(100), 256));
    }

    #[test]
    fn test_coerce_nested_lists() {
        let abi = erc20();
        let function = select_function(&abi, "batch", 2).unwrap();
        let values = coerce_args(
            function,
            &[
                vec!["0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0"].into(),
                vec![1u64, 2u64].into(),
            ],
        )
        .unwrap();

        match &values[0] {
            DynSolValue::Array(items) => assert_eq!(items.len(), 1),
            other => panic!("expected array, got {other:?}"),
        }
        assert_eq!(
            values[1],
            DynSolValue::FixedArray(vec![
                DynSolValue::Uint(U256::from(1), 256),
                DynSolValue::Uint(U256::from(2), 256),
            ])
        );
    }

    #[test]
    fn test_fixed_array_size_mismatch() {
        let abi = erc20();
        let function = select_function(&abi, "batch", 2).unwrap();
        let err = coerce_args(function, &[Param::List(vec![]), vec![1u64].into()]).unwrap_err();
        assert!(matches!(err, WalletError::InvalidParam { index: 1, .. }));
    }

    #[test]
    fn test_select_overload_by_arity() {
        let abi = erc20();
        assert_eq!(select_function(&abi, "safeTransferFrom", 3).unwrap().inputs.len(), 3);
        assert_eq!(select_function(&abi, "safeTransferFrom", 4).unwrap().inputs.len(), 4);

        let err = select_function(&abi, "safeTransferFrom", 2).unwrap_err();
        assert!(matches!(err, WalletError::ArgumentCount { got: 2, .. }));
    }

    #[test]
    fn test_unknown_method() {
        let abi = erc20();
        let err = select_function(&abi, "mint", 1).unwrap_err();
        assert!(matches!(err, WalletError::UnknownMethod { .. }));
    }

    #[test]
    fn test_invalid_address_reports_position() {
        let abi = erc20();
        let function = select_function(&abi, "balanceOf", 1).unwrap();
        let err = coerce_args(function, &["0xnothex".into()]).unwrap_err();
        match err {
            WalletError::InvalidParam { index, kind, .. } => {
                assert_eq!(index, 0);
                assert_eq!(kind, "address");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_number_for_uint() {
        let abi = erc20();
        let function = select_function(&abi, "transfer", 2).unwrap();
        let err = coerce_args(
            function,
            &["0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0".into(), Param::Num(-1)],
        )
        .unwrap_err();
        assert!(matches!(err, WalletError::InvalidParam { index: 1, .. }));
    }
}
