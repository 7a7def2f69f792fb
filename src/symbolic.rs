#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use graphique::symbolic::parse_expr::parse;
/// let parsed_expression = parse("3*x**2 + 2*x - 4").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// // implicit multiplication and dangling operators are rejected with a position
/// let err = parse("x +* 2").unwrap_err();
/// assert_eq!(err.position, 3);
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree
/// 2) differentiates, integrates and simplifies it
/// 3) turns a symbolic expression into a Rust function
///# Example#
/// ```
/// use graphique::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression_checked("2*x**2 + 4*x + 1").unwrap();
/// // derivative chain: first and second derivative, simplified
/// let chain = f.derivative_chain("x", 2);
/// assert_eq!(chain[0].to_string(), "4*x + 4");
/// assert_eq!(chain[1].to_string(), "4");
/// // antiderivative, None when there is no closed form
/// let big_f = f.antiderivative("x").unwrap();
/// println!("∫f(x)dx = {} + C", big_f);
/// // convert to a Rust function and evaluate
/// let func = f.lambdify1D("x").unwrap();
/// assert_eq!(func(1.0), 7.0);
/// // compare analytical and numerical derivatives on a grid
/// let (norm, ok) = f.compare_num1D("x", -5.0, 5.0, 100, 1e-6).unwrap();
/// println!("norm = {}, res = {}", norm, ok);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
pub mod symbolic_integration;
pub mod symbolic_lambdify;
pub mod symbolic_simplify;
///______________________________________________________________________________________________________________________________________________
/// grid and norm helpers
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
