use tools::{ParamKind, ParamSpec, ToolBuilder, ToolDescriptor, ToolError};

pub fn sum_two() -> ToolBuilder {
    ToolDescriptor::builder("sum_two")
        .doc(
            "Adds two numbers together.

            Args:
                a (int): The first number.
                b (int): The second number.",
        )
        .param(ParamSpec::new("a", ParamKind::Integer))
        .param(ParamSpec::new("b", ParamKind::Integer))
        .handler(|args| {
            let a: i64 = args.get("a")?;
            let b: i64 = args.get("b")?;
            a.checked_add(b)
                .ok_or_else(|| ToolError::Execution(format!("{a} + {b} overflows")))
        })
}
