//! String forms of runtime values.

use kiln_ir::Program;

use crate::rt::{Object, ObjectValue};

/// The string form used by `+` concatenation, `print`, and dynamic keys.
///
/// An array that contains itself, directly or through nested arrays,
/// renders the repeated occurrence as `[...]`.
pub fn display(program: &Program, obj: &Object) -> String {
    display_nested(program, obj, &mut Vec::new())
}

fn display_nested(program: &Program, obj: &Object, open: &mut Vec<Object>) -> String {
    match obj.value() {
        ObjectValue::None if obj.is_null() => "null".to_owned(),
        ObjectValue::None => format!("[object {}]", program.type_token(obj.ty())),
        ObjectValue::Bool(b) => b.to_string(),
        ObjectValue::Number(n) => format_number(*n),
        ObjectValue::String(s) => s.to_string(),
        ObjectValue::Array(_) if open.iter().any(|outer| outer.same(obj)) => "[...]".to_owned(),
        ObjectValue::Array(elements) => {
            open.push(obj.clone());
            let items: Vec<String> = elements
                .borrow()
                .iter()
                .map(|cell| display_nested(program, &cell.obj(), open))
                .collect();
            open.pop();
            format!("[{}]", items.join(", "))
        }
        ObjectValue::Function(stub) => {
            format!("[function {}]", program.function_token(stub.function))
        }
        ObjectValue::Pointer(_) => format!("[pointer {}]", program.type_token(obj.ty())),
    }
}

/// Render a number the way the language prints it: integral values
/// without a fraction, `NaN` and `Infinity` spelled out.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// Multi-line dump of an object, used when a non-string value is thrown
/// out of the program.
///
/// Primitives render as `type: value`. Everything else renders its type,
/// then one `indent`-prefixed line per own property or array element.
pub fn details(program: &Program, obj: &Object, indent: &str) -> String {
    let ty = program.type_token(obj.ty());
    let mut lines = Vec::new();
    match obj.value() {
        ObjectValue::Bool(_) | ObjectValue::Number(_) | ObjectValue::String(_) => {
            return format!("{ty}: {}", display(program, obj));
        }
        ObjectValue::None if obj.is_null() => return "null".to_owned(),
        ObjectValue::Array(elements) => {
            lines.push(ty);
            for (index, cell) in elements.borrow().iter().enumerate() {
                lines.push(format!("{indent}[{index}] = {}", display(program, &cell.obj())));
            }
        }
        ObjectValue::None | ObjectValue::Function(_) | ObjectValue::Pointer(_) => {
            lines.push(ty);
        }
    }
    for (key, cell) in obj.properties().entries() {
        lines.push(format!("{indent}{key} = {}", display(program, &cell.obj())));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests;
