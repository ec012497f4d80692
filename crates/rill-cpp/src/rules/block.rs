//! Value-producing block lowering, driven by the runtime policy.

use rill_core::ast::ExprBlock;
use rill_core::error::Error;
use rill_core::Result;
use tracing::debug;

use crate::ast::CxxExpr;
use crate::engine::Lowerer;
use crate::policy::BlockStrategy;

pub fn lower_block_value(lw: &mut Lowerer, block: &ExprBlock) -> Result<CxxExpr> {
    let class = lw.analyzer.classify_block(block);
    let mut strategy = lw.policy.block_strategy(class);
    // Inline substitution is only sound when there is nothing but the
    // result expression; a policy override cannot drop statements.
    if strategy == BlockStrategy::Inline && !block.stmts.is_empty() {
        debug!(?class, "inline block strategy with statements present, using closure");
        strategy = BlockStrategy::Iife;
    }
    match strategy {
        BlockStrategy::Inline => match block.result.as_deref() {
            Some(result) => lw.lower_expr(result),
            None => Err(Error::unsupported("empty block in value position")),
        },
        BlockStrategy::Iife => {
            let body = lw.lower_body(block)?;
            Ok(CxxExpr::iife(body))
        }
    }
}
