//! 配置校验模块
//!
//! 校验规则：
//! - 至少一个 stream
//! - stream id 非空且唯一
//! - 时钟频率 > 0 (全局及 stream 覆盖值)

use std::collections::HashSet;

use contracts::{ContractError, ReadoutConfig};

/// 校验 ReadoutConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &ReadoutConfig) -> Result<(), ContractError> {
    validate_streams_present(config)?;
    validate_stream_ids(config)?;
    validate_clock_rates(config)?;
    Ok(())
}

fn validate_streams_present(config: &ReadoutConfig) -> Result<(), ContractError> {
    if config.streams.is_empty() {
        return Err(ContractError::config_validation(
            "streams",
            "at least one stream is required",
        ));
    }
    Ok(())
}

fn validate_stream_ids(config: &ReadoutConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (i, stream) in config.streams.iter().enumerate() {
        if stream.id.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("streams[{i}].id"),
                "stream id must not be empty",
            ));
        }
        if !seen.insert(&stream.id) {
            return Err(ContractError::config_validation(
                format!("streams[id={}]", stream.id),
                "duplicate stream id",
            ));
        }
    }
    Ok(())
}

fn validate_clock_rates(config: &ReadoutConfig) -> Result<(), ContractError> {
    if config.clock.rate_hz.hz() == 0 {
        return Err(ContractError::config_validation(
            "clock.rate_hz",
            "rate_hz must be > 0",
        ));
    }

    for stream in &config.streams {
        if stream.clock_rate_hz.is_some_and(|c| c.hz() == 0) {
            return Err(ContractError::config_validation(
                format!("streams[{}].clock_rate_hz", stream.id),
                "clock_rate_hz must be > 0",
            ));
        }
    }
    Ok(())
}
