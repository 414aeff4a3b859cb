//! 函数块
//!
//! ```text
//! function  := '[' key ':' metadata? statement* ']'
//! statement := keyword name ':' expression ';'
//!            | keyword name ';'
//!            | keyword name '[' expression (';' expression)* ']'
//!            | name '[' keyword? expression (';' keyword? expression)* ']'
//! ```
//!
//! 调用语句后面的 `;` 可以省略。
//!
//! 函数块解析一次，之后可以用不同的参数和调用方作用域多次运行。
//! 私有局部变量在多次运行之间保留，需要时调用 [`FunctionDef::reset_locals`]。

use std::io::BufRead;

use nea_config::{EngineConfig, Phase, WritePolicy};
use tracing::{debug, trace};

use crate::collections::{Keyed, KeyedList};
use crate::error::{NeaError, NeaResult};
use crate::expr::{Expression, ExpressionHolder, Primitive, Scopes, ValueDomain};
use crate::kit::reader::{Scanner, SourcePosition};
use crate::tree::{ParseMode, Scalar, ValueNode};

use super::native::NativeRegistry;
use super::statement::{Keyword, Statement};

const TARGET: &str = "neakit::function";

/// 名字的终止字符（空白之外）
const NAME_STOPS: [char; 3] = ['[', ':', ';'];

/// 函数块定义
#[derive(Debug, Clone)]
pub struct FunctionDef {
    key: String,
    meta: Option<ValueNode>,
    parameters: Vec<String>,
    statements: Vec<Statement>,
    locals: KeyedList<ValueNode>,
    /// 声明时的局部变量初值，用于重置
    declared: Vec<ValueNode>,
    config: EngineConfig,
}

impl Keyed for FunctionDef {
    type Key = str;

    fn key(&self) -> &str {
        &self.key
    }
}

impl FunctionDef {
    fn empty(key: &str, config: EngineConfig) -> Self {
        Self {
            key: key.to_string(),
            meta: None,
            parameters: Vec::new(),
            statements: Vec::new(),
            locals: KeyedList::with_capacity(4),
            declared: Vec::new(),
            config,
        }
    }

    /// 解析一个函数块
    pub fn parse(text: &str, natives: &NativeRegistry, config: EngineConfig) -> NeaResult<Self> {
        Self::parse_from(&mut Scanner::from_text(text), natives, config)
    }

    /// 解析文本中的所有函数块，按名字排序
    pub fn parse_all(
        text: &str,
        natives: &NativeRegistry,
        config: EngineConfig,
    ) -> NeaResult<KeyedList<FunctionDef>> {
        let mut scanner = Scanner::from_text(text);
        let mut functions = KeyedList::new();
        loop {
            scanner.skip_whitespace();
            if scanner.is_eof() {
                break;
            }
            functions.add(Self::parse_from(&mut scanner, natives, config)?);
        }
        Ok(functions)
    }

    pub fn parse_from<R: BufRead>(
        scanner: &mut Scanner<R>,
        natives: &NativeRegistry,
        config: EngineConfig,
    ) -> NeaResult<Self> {
        let mut body = scanner.enter_section('[', ']')?;
        body.skip_whitespace();
        let key_position = body.position();
        let key = body.read_until(':', false);
        if !body.match_char(':') {
            return Err(NeaError::syntax(
                Phase::Function,
                format!("missing ':' after function name '{}'", key.trim()),
                key_position,
            ));
        }

        let mut def = Self::empty(key.trim(), config);
        body.skip_whitespace();
        if body.check('[') {
            def.meta = Some(ValueNode::parse_from(&mut body, ParseMode::Recursive)?);
        }

        loop {
            body.skip_whitespace();
            if body.is_eof() {
                break;
            }
            def.parse_statement(&mut body, natives)?;
        }

        debug!(
            target: TARGET,
            function = %def.key,
            parameters = def.parameters.len(),
            statements = def.statements.len(),
            "Parsed function"
        );
        Ok(def)
    }

    fn parse_statement<R: BufRead>(&mut self, body: &mut Scanner<R>, natives: &NativeRegistry) -> NeaResult<()> {
        let position = body.position();
        let word = body.read_until_whitespace_or(&NAME_STOPS, false);
        if word.is_empty() {
            let found = body.peek().unwrap_or(' ');
            return Err(NeaError::syntax(
                Phase::Function,
                format!("expected a statement, found '{found}'"),
                position,
            ));
        }

        let Some(keyword) = Keyword::from_word(&word) else {
            body.skip_whitespace();
            if !body.match_char('[') {
                return Err(NeaError::syntax(
                    Phase::Function,
                    format!("unknown statement '{word}'"),
                    position,
                ));
            }
            let args = parse_arguments(body, None)?;
            body.skip_whitespace();
            body.match_char(';');
            return self.push_call(word, args, natives, position);
        };

        body.skip_whitespace();
        let name_position = body.position();
        let name = body.read_until_whitespace_or(&NAME_STOPS, false);
        if name.is_empty() {
            return Err(NeaError::syntax(
                Phase::Function,
                format!("expected a name after '{word}'"),
                name_position,
            ));
        }

        body.skip_whitespace();
        match (body.next_char(), keyword.domain()) {
            (Some(';'), _) => {
                self.declare(keyword, &name);
                Ok(())
            }
            (Some(':'), Some(domain)) => {
                self.declare(keyword, &name);
                let expression = Expression::parse_from(body)?;
                body.skip_whitespace();
                if !body.match_char(';') {
                    return Err(NeaError::syntax(
                        Phase::Function,
                        format!("missing ';' after assignment to '{name}'"),
                        body.position(),
                    ));
                }
                self.statements.push(Statement::Assignment {
                    target: name,
                    holder: ExpressionHolder::new(expression, domain),
                });
                Ok(())
            }
            (Some('['), Some(domain)) => {
                let args = parse_arguments(body, Some(domain))?;
                body.skip_whitespace();
                body.match_char(';');
                self.push_call(name, args, natives, name_position)
            }
            (Some(':'), None) => Err(NeaError::syntax(
                Phase::Function,
                format!("parameter '{name}' cannot have an initializer"),
                name_position,
            )),
            (Some('['), None) => Err(NeaError::syntax(
                Phase::Function,
                format!("'param' cannot introduce a call to '{name}'"),
                name_position,
            )),
            (found, _) => Err(NeaError::syntax(
                Phase::Function,
                format!(
                    "expected ';', ':' or '[' after '{name}', found {}",
                    found.map_or_else(|| "end of input".to_string(), |c| format!("'{c}'"))
                ),
                body.position(),
            )),
        }
    }

    fn push_call(
        &mut self,
        name: String,
        args: Vec<ExpressionHolder>,
        natives: &NativeRegistry,
        position: SourcePosition,
    ) -> NeaResult<()> {
        match natives.get(&name) {
            Some(native) => {
                self.statements.push(Statement::Call { name, native, args });
                Ok(())
            }
            None if self.config.strict_natives => Err(NeaError::syntax(
                Phase::Function,
                format!("unknown native function '{name}'"),
                position,
            )),
            None => {
                debug!(target: TARGET, function = %self.key, native = %name, "Dropping call to unregistered native");
                Ok(())
            }
        }
    }

    fn declare(&mut self, keyword: Keyword, name: &str) {
        if keyword == Keyword::Param && !self.parameters.iter().any(|p| p == name) {
            self.parameters.push(name.to_string());
        }
        if self.locals.contains(name) {
            return;
        }
        let initial = match keyword.domain() {
            Some(domain) => ValueNode::leaf(name, domain.zero()),
            None => ValueNode::leaf(name, Scalar::default()),
        };
        self.locals.add(initial.clone());
        self.declared.push(initial);
    }

    /// 运行函数
    ///
    /// 参数按声明顺序绑定到私有局部变量，然后依次执行语句。
    /// 读写顺序由 [`WritePolicy`] 决定。
    pub fn run<S: AsRef<str>>(&mut self, arguments: &[S], caller: &mut KeyedList<ValueNode>) -> NeaResult<()> {
        if arguments.len() != self.parameters.len() {
            return Err(NeaError::Arity {
                function: self.key.clone(),
                expected: self.parameters.len(),
                found: arguments.len(),
            });
        }

        for (name, argument) in self.parameters.iter().zip(arguments) {
            match self.locals.get_key_mut(name.as_str()) {
                Some(local) => local.set_text(argument.as_ref()),
                None => self.locals.add(ValueNode::leaf_from_text(name.as_str(), argument.as_ref())),
            }
        }

        let policy = self.config.write_policy;
        for statement in &self.statements {
            match statement {
                Statement::Assignment { target, holder } => {
                    let value = holder.evaluate(&scopes_for(policy, caller, &self.locals))?;
                    trace!(target: TARGET, function = %self.key, variable = %target, %value, "Assign");
                    assign(policy, caller, &mut self.locals, target, value);
                }
                Statement::Call { name, native, args } => {
                    let scopes = scopes_for(policy, caller, &self.locals);
                    let values = args
                        .iter()
                        .map(|arg| arg.evaluate(&scopes))
                        .collect::<NeaResult<Vec<Primitive>>>()?;
                    trace!(target: TARGET, function = %self.key, native = %name, args = values.len(), "Call");
                    let callback: &dyn Fn(&[Primitive]) = &**native;
                    callback(&values);
                }
            }
        }
        Ok(())
    }

    /// 将私有局部变量恢复为声明时的初值
    pub fn reset_locals(&mut self) {
        self.locals = self.declared.iter().cloned().collect();
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn meta(&self) -> Option<&ValueNode> {
        self.meta.as_ref()
    }

    /// 读取元数据中的子节点
    pub fn meta_get(&self, key: &str) -> Option<&ValueNode> {
        self.meta.as_ref().and_then(|meta| meta.get(key))
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn locals(&self) -> &KeyedList<ValueNode> {
        &self.locals
    }

    pub fn local(&self, name: &str) -> Option<&ValueNode> {
        self.locals.get_key(name)
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }
}

/// 解析调用参数列表（`[` 已被消费）
///
/// `fixed` 为 `None` 时每个参数可以自带关键字，否则默认为小数。
fn parse_arguments<R: BufRead>(
    body: &mut Scanner<R>,
    fixed: Option<ValueDomain>,
) -> NeaResult<Vec<ExpressionHolder>> {
    let open = body.position();
    let mut args = Vec::new();
    loop {
        body.skip_whitespace();
        if body.match_char(']') {
            return Ok(args);
        }
        if body.is_eof() {
            return Err(NeaError::syntax(
                Phase::Function,
                "unterminated argument list, expected ']'",
                open,
            ));
        }

        let domain = match fixed {
            Some(domain) => domain,
            None => argument_domain(body),
        };
        let expression = Expression::parse_from(body)?;
        args.push(ExpressionHolder::new(expression, domain));

        body.skip_whitespace();
        if !body.match_char(';') && !body.check(']') {
            let found = body.peek().map_or_else(|| "end of input".to_string(), |c| format!("'{c}'"));
            return Err(NeaError::syntax(
                Phase::Function,
                format!("expected ';' or ']' in argument list, found {found}"),
                body.position(),
            ));
        }
    }
}

/// 未带值域的调用参数可以以关键字开头，例如 `print [int x; bool flag]`
fn argument_domain<R: BufRead>(body: &mut Scanner<R>) -> ValueDomain {
    let word = body.read_until_whitespace_or(&[']', ';', '('], false);
    if let Some(domain) = Keyword::from_word(&word).and_then(|k| k.domain()) {
        if body.peek().is_some_and(char::is_whitespace) {
            return domain;
        }
    }
    body.unread(&word);
    ValueDomain::Decimal
}

fn scopes_for<'a>(
    policy: WritePolicy,
    caller: &'a KeyedList<ValueNode>,
    locals: &'a KeyedList<ValueNode>,
) -> Scopes<'a> {
    match policy {
        WritePolicy::CallerFirst => Scopes::with_fallback(caller, locals),
        WritePolicy::LocalFirst => Scopes::with_fallback(locals, caller),
    }
}

/// 写入已存在变量的作用域（按策略的先后顺序），都不存在时写入局部变量
fn assign(
    policy: WritePolicy,
    caller: &mut KeyedList<ValueNode>,
    locals: &mut KeyedList<ValueNode>,
    target: &str,
    value: Primitive,
) {
    let into_caller = match policy {
        WritePolicy::CallerFirst => caller.contains(target),
        WritePolicy::LocalFirst => !locals.contains(target) && caller.contains(target),
    };
    let scope = if into_caller { caller } else { locals };
    match scope.get_key_mut(target) {
        Some(node) => node.set_scalar(value),
        None => scope.add(ValueNode::leaf(target, value)),
    }
}
