//! Elaboration of backend theory terms into interned formula nodes.

use tempo_core::{Symbol, TheoryTerm, FINAL_MARKER, INITIAL_MARKER};

use crate::formula::{BoolOp, NodeId, TelOp};
use crate::theory::Theory;
use crate::{TheoryError, TheoryResult};

const BINARY_OPERATORS: [&str; 5] = ["&", "|", "<>", "<-", "->"];
const UNARY_OPERATORS: [&str; 1] = ["~"];
const TEL_OPERATORS: [&str; 10] = ["<", ">", "<:", ">:", "<*", ">*", "<?", ">?", "<<", ">>"];

fn binary_op(name: &str) -> Option<BoolOp> {
    match name {
        "&" => Some(BoolOp::And),
        "|" => Some(BoolOp::Or),
        "<>" => Some(BoolOp::Eq),
        "<-" => Some(BoolOp::LeftImplies),
        "->" => Some(BoolOp::RightImplies),
        _ => None,
    }
}

fn is_operator(name: &str) -> bool {
    BINARY_OPERATORS.contains(&name)
        || UNARY_OPERATORS.contains(&name)
        || TEL_OPERATORS.contains(&name)
}

/// Build a ground argument symbol. Operator names and collection terms have
/// no symbol reading.
pub fn symbol_from_term(term: &TheoryTerm) -> TheoryResult<Symbol> {
    let (name, args): (&str, &[TheoryTerm]) = match term {
        TheoryTerm::Number(n) => return Ok(Symbol::Number(*n)),
        TheoryTerm::List(_) | TheoryTerm::Set(_) => {
            return Err(TheoryError::InvalidSymbol(term.to_string()))
        }
        TheoryTerm::Tuple(args) => ("", args),
        TheoryTerm::Symbol(name) => (name, &[]),
        TheoryTerm::Function(name, args) => (name, args),
    };
    if is_operator(name) {
        return Err(TheoryError::InvalidSymbol(term.to_string()));
    }
    if args.is_empty() {
        if name == "#inf" {
            return Ok(Symbol::Infimum);
        }
        if name == "#sup" {
            return Ok(Symbol::Supremum);
        }
        if name.len() > 1 && name.starts_with('"') && name.ends_with('"') {
            return Ok(Symbol::String(name[1..name.len() - 1].to_string()));
        }
    }
    let args = args.iter().map(symbol_from_term).collect::<Result<_, _>>()?;
    Ok(Symbol::fun(name, args))
}

/// Build a predicate atom node. A leading `-` flips the polarity.
pub fn atom_from_term(
    theory: &mut Theory,
    term: &TheoryTerm,
    positive: bool,
) -> TheoryResult<NodeId> {
    match term {
        TheoryTerm::Symbol(name) => theory.atom(name, Vec::new(), positive),
        TheoryTerm::Function(name, args) if name == "-" => match args.first() {
            Some(arg) => atom_from_term(theory, arg, !positive),
            None => Err(TheoryError::InvalidAtom(term.to_string())),
        },
        TheoryTerm::Function(name, args) if !is_operator(name) => {
            let args = args.iter().map(symbol_from_term).collect::<Result<_, _>>()?;
            theory.atom(name, args, positive)
        }
        _ => Err(TheoryError::InvalidAtom(term.to_string())),
    }
}

/// Elaborate one theory term into its interned formula node, recursively
/// interning every sub-formula.
pub fn formula_from_term(theory: &mut Theory, term: &TheoryTerm) -> TheoryResult<NodeId> {
    match term {
        TheoryTerm::Symbol(_) => atom_from_term(theory, term, true),
        TheoryTerm::Function(name, args) => {
            if let (Some(op), [lhs, rhs]) = (binary_op(name), args.as_slice()) {
                let lhs = formula_from_term(theory, lhs)?;
                let rhs = formula_from_term(theory, rhs)?;
                return Ok(theory.boolean(op, lhs, rhs));
            }
            if let ("~", [arg]) = (name.as_str(), args.as_slice()) {
                let arg = formula_from_term(theory, arg)?;
                return Ok(theory.negation(arg));
            }
            if TEL_OPERATORS.contains(&name.as_str()) {
                return tel_from_term(theory, term, name, args);
            }
            if name == "&" {
                return match args.first() {
                    Some(TheoryTerm::Symbol(marker)) => match marker.as_str() {
                        "initial" => theory.atom(INITIAL_MARKER, Vec::new(), true),
                        "final" => theory.atom(FINAL_MARKER, Vec::new(), true),
                        "true" => Ok(theory.constant(true)),
                        "false" => Ok(theory.constant(false)),
                        _ => Err(TheoryError::UnknownIdentifier(term.to_string())),
                    },
                    _ => Err(TheoryError::InvalidFormula(term.to_string())),
                };
            }
            atom_from_term(theory, term, true)
        }
        _ => Err(TheoryError::InvalidFormula(term.to_string())),
    }
}

/// Temporal operators take the last argument as the body and an optional
/// first argument as the left-hand side of a binary fixed point.
fn tel_from_term(
    theory: &mut Theory,
    term: &TheoryTerm,
    name: &str,
    args: &[TheoryTerm],
) -> TheoryResult<NodeId> {
    let (lhs, rhs) = match args {
        [] => return Err(TheoryError::InvalidFormula(term.to_string())),
        [rhs] => (None, rhs),
        [lhs, .., rhs] => (Some(formula_from_term(theory, lhs)?), rhs),
    };
    let rhs = formula_from_term(theory, rhs)?;
    match name {
        "<" | "<:" => Ok(theory.previous(rhs, name == "<:")),
        "<*" => Ok(theory.tel_past(TelOp::Trigger, lhs, rhs)),
        "<?" => Ok(theory.tel_past(TelOp::Since, lhs, rhs)),
        "<<" => Ok(theory.initially(rhs)),
        ">" | ">:" => Ok(theory.next(rhs, name == ">:")),
        ">*" => Ok(theory.tel_future(TelOp::Trigger, lhs, rhs)),
        ">?" => Ok(theory.tel_future(TelOp::Since, lhs, rhs)),
        ">>" => {
            // p >> q holds when q holds in every remaining step, so it
            // unrolls as always (not final -> body).
            let final_atom = theory.atom(FINAL_MARKER, Vec::new(), true)?;
            let not_final = theory.negation(final_atom);
            let rhs = theory.boolean(BoolOp::Or, not_final, rhs);
            Ok(theory.tel_future(TelOp::Trigger, None, rhs))
        }
        _ => unreachable!("temporal operator table is closed"),
    }
}
