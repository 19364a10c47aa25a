//! Test helpers for asserting parameter parser outcomes.
use super::Token;
use super::parameter::parse_angle;
use crate::errors::StepSyntaxError;

pub(crate) fn parse_angle_ok(text: &str) -> (usize, Token) {
    match parse_angle(text, 0) {
        Ok(result) => result,
        Err(err) => panic!("parameter should parse: {err}"),
    }
}

pub(crate) fn parse_angle_err(text: &str) -> StepSyntaxError {
    match parse_angle(text, 0) {
        Ok(_) => panic!("parameter parsing should fail"),
        Err(err) => err,
    }
}
