use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt};
use alloy_json_abi::Function;
use alloy_primitives::{Address, Bytes};

use crate::error::ProviderError;

/// A single contract method invocation: target address, ABI fragment, and the
/// arguments as user-supplied strings.
///
/// Arguments are coerced to their ABI types at encoding time, the same way
/// `cast` turns CLI strings into calldata, so form input flows through
/// without an intermediate typed layer.
#[derive(Debug, Clone)]
pub struct ContractCall {
    to: Address,
    function: Function,
    args: Vec<String>,
}

impl ContractCall {
    /// Parse a human-readable fragment like `"transfer(address,uint256)"`.
    pub fn new(to: Address, signature: &str) -> Result<Self, ProviderError> {
        let function = Function::parse(signature)
            .map_err(|e| ProviderError::InvalidArgs(e.to_string()))?;
        Ok(Self { to, function, args: Vec::new() })
    }

    /// Append an argument in its string form.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    /// The contract address this call targets.
    pub fn to(&self) -> Address {
        self.to
    }

    /// The canonical method signature.
    pub fn signature(&self) -> String {
        self.function.signature()
    }

    /// The arguments as supplied.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// ABI-encode the call: 4-byte selector followed by the encoded args.
    pub fn calldata(&self) -> Result<Bytes, ProviderError> {
        if self.args.len() != self.function.inputs.len() {
            return Err(ProviderError::InvalidArgs(format!(
                "{} takes {} arguments, got {}",
                self.signature(),
                self.function.inputs.len(),
                self.args.len(),
            )));
        }
        let values = std::iter::zip(&self.function.inputs, &self.args)
            .map(|(input, arg)| coerce_value(&input.selector_type(), arg))
            .collect::<Result<Vec<_>, _>>()?;
        let data = self
            .function
            .abi_encode_input(&values)
            .map_err(|e| ProviderError::InvalidArgs(e.to_string()))?;
        Ok(data.into())
    }
}

fn coerce_value(ty: &str, arg: &str) -> Result<DynSolValue, ProviderError> {
    let ty = DynSolType::parse(ty).map_err(|e| ProviderError::InvalidArgs(e.to_string()))?;
    ty.coerce_str(arg).map_err(|e| ProviderError::InvalidArgs(e.to_string()))
}
