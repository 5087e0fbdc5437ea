use cabin_class::ConstantValue;
use cabin_core::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};
use cabin_reader::MAGIC;
use std::collections::HashMap;

const OBJECT: &str = "java/lang/Object";

/// `return`
pub const RETURN: [u8; 1] = [0xb1];

/// An attribute written onto a field.
#[derive(Clone, Debug)]
pub enum FieldAttribute {
	ConstantValue(ConstantValue),
	Signature(String),
	Deprecated,
	Synthetic,
	/// A `ConstantValue` pointing at this pool entry, written as is.
	RawConstantValue(Vec<u8>),
	/// Written verbatim, the reader skips it.
	Other(String, Vec<u8>),
}

#[derive(Clone, Debug)]
struct FieldEntry {
	flags: FieldAccessFlags,
	name: String,
	descriptor: String,
	attributes: Vec<FieldAttribute>,
	/// Attribute count written instead of the real one.
	claimed_attributes: Option<u16>,
}

#[derive(Clone, Debug)]
struct MethodEntry {
	flags: MethodAccessFlags,
	name: String,
	descriptor: String,
	code: Option<Vec<u8>>,
}

/// Builds class files for tests.
#[derive(Clone, Debug)]
pub struct ClassWriter {
	pub name: String,
	super_class: Option<String>,
	interfaces: Vec<String>,
	flags: ClassAccessFlags,
	fields: Vec<FieldEntry>,
	methods: Vec<MethodEntry>,
	source_file: Option<String>,
}

impl ClassWriter {
	/// A public class extending `java/lang/Object`. Names may use dots.
	pub fn new(name: &str) -> ClassWriter {
		let name = cabin_core::to_internal(name);
		ClassWriter {
			super_class: (name != OBJECT).then(|| OBJECT.to_string()),
			name,
			interfaces: Vec::new(),
			flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
			fields: Vec::new(),
			methods: Vec::new(),
			source_file: None,
		}
	}

	pub fn interface(name: &str) -> ClassWriter {
		ClassWriter::new(name)
			.flags(ClassAccessFlags::PUBLIC | ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT)
	}

	pub fn super_class(mut self, name: &str) -> Self {
		self.super_class = Some(cabin_core::to_internal(name));
		self
	}

	pub fn no_super_class(mut self) -> Self {
		self.super_class = None;
		self
	}

	pub fn implements(mut self, name: &str) -> Self {
		self.interfaces.push(cabin_core::to_internal(name));
		self
	}

	pub fn flags(mut self, flags: ClassAccessFlags) -> Self {
		self.flags = flags;
		self
	}

	pub fn source_file(mut self, source_file: &str) -> Self {
		self.source_file = Some(source_file.to_string());
		self
	}

	pub fn field(self, flags: FieldAccessFlags, name: &str, descriptor: &str) -> Self {
		self.field_with(flags, name, descriptor, vec![])
	}

	pub fn field_with(
		mut self,
		flags: FieldAccessFlags,
		name: &str,
		descriptor: &str,
		attributes: Vec<FieldAttribute>,
	) -> Self {
		self.fields.push(FieldEntry {
			flags,
			name: name.to_string(),
			descriptor: descriptor.to_string(),
			attributes,
			claimed_attributes: None,
		});
		self
	}

	/// A field whose attribute table claims `claimed` entries while holding `attributes`.
	pub fn broken_field(
		mut self,
		name: &str,
		descriptor: &str,
		claimed: u16,
		attributes: Vec<FieldAttribute>,
	) -> Self {
		self.fields.push(FieldEntry {
			flags: FieldAccessFlags::empty(),
			name: name.to_string(),
			descriptor: descriptor.to_string(),
			attributes,
			claimed_attributes: Some(claimed),
		});
		self
	}

	pub fn constant(self, name: &str, descriptor: &str, value: ConstantValue) -> Self {
		self.field_with(
			FieldAccessFlags::PUBLIC | FieldAccessFlags::STATIC | FieldAccessFlags::FINAL,
			name,
			descriptor,
			vec![FieldAttribute::ConstantValue(value)],
		)
	}

	pub fn method(mut self, flags: MethodAccessFlags, name: &str, descriptor: &str, code: Option<Vec<u8>>) -> Self {
		self.methods.push(MethodEntry {
			flags,
			name: name.to_string(),
			descriptor: descriptor.to_string(),
			code,
		});
		self
	}

	/// `static void <clinit>()` with an empty body.
	pub fn clinit(self) -> Self {
		self.method(MethodAccessFlags::STATIC, "<clinit>", "()V", Some(RETURN.to_vec()))
	}

	/// A non-abstract instance method, on an interface this is a default method.
	pub fn default_method(self, name: &str) -> Self {
		self.method(MethodAccessFlags::PUBLIC, name, "()V", Some(RETURN.to_vec()))
	}

	pub fn abstract_method(self, name: &str) -> Self {
		self.method(
			MethodAccessFlags::PUBLIC | MethodAccessFlags::ABSTRACT,
			name,
			"()V",
			None,
		)
	}

	pub fn to_bytes(&self) -> Vec<u8> {
		let mut pool = PoolWriter::default();
		let mut body = Vec::new();

		let this_class = pool.class(&self.name);
		let super_class = match &self.super_class {
			Some(name) => pool.class(name),
			None => 0,
		};
		put_u16(&mut body, self.flags.bits());
		put_u16(&mut body, this_class);
		put_u16(&mut body, super_class);

		put_u16(&mut body, self.interfaces.len() as u16);
		for interface in &self.interfaces {
			let index = pool.class(interface);
			put_u16(&mut body, index);
		}

		put_u16(&mut body, self.fields.len() as u16);
		for field in &self.fields {
			put_u16(&mut body, field.flags.bits());
			put_u16(&mut body, pool.utf8(&field.name));
			put_u16(&mut body, pool.utf8(&field.descriptor));
			put_u16(
				&mut body,
				field.claimed_attributes.unwrap_or(field.attributes.len() as u16),
			);
			for attribute in &field.attributes {
				let (name, data) = match attribute {
					FieldAttribute::ConstantValue(value) => {
						("ConstantValue", pool.value(value).to_be_bytes().to_vec())
					}
					FieldAttribute::Signature(signature) => {
						("Signature", pool.utf8(signature).to_be_bytes().to_vec())
					}
					FieldAttribute::Deprecated => ("Deprecated", vec![]),
					FieldAttribute::Synthetic => ("Synthetic", vec![]),
					FieldAttribute::RawConstantValue(entry) => {
						("ConstantValue", pool.add(entry.clone()).to_be_bytes().to_vec())
					}
					FieldAttribute::Other(name, data) => (name.as_str(), data.clone()),
				};
				write_attribute(&mut body, &mut pool, name, &data);
			}
		}

		put_u16(&mut body, self.methods.len() as u16);
		for method in &self.methods {
			put_u16(&mut body, method.flags.bits());
			put_u16(&mut body, pool.utf8(&method.name));
			put_u16(&mut body, pool.utf8(&method.descriptor));
			match &method.code {
				Some(code) => {
					put_u16(&mut body, 1);
					let mut data = Vec::new();
					put_u16(&mut data, 2);
					put_u16(&mut data, 1);
					data.extend_from_slice(&(code.len() as u32).to_be_bytes());
					data.extend_from_slice(code);
					put_u16(&mut data, 0);
					put_u16(&mut data, 0);
					write_attribute(&mut body, &mut pool, "Code", &data);
				}
				None => put_u16(&mut body, 0),
			}
		}

		match &self.source_file {
			Some(source_file) => {
				put_u16(&mut body, 1);
				let index = pool.utf8(source_file);
				write_attribute(&mut body, &mut pool, "SourceFile", &index.to_be_bytes());
			}
			None => put_u16(&mut body, 0),
		}

		let mut out = MAGIC.to_vec();
		put_u16(&mut out, 0);
		put_u16(&mut out, 52);
		put_u16(&mut out, pool.next);
		out.extend_from_slice(&pool.data);
		out.extend_from_slice(&body);
		out
	}
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
	out.extend_from_slice(&value.to_be_bytes());
}

fn write_attribute(out: &mut Vec<u8>, pool: &mut PoolWriter, name: &str, data: &[u8]) {
	put_u16(out, pool.utf8(name));
	out.extend_from_slice(&(data.len() as u32).to_be_bytes());
	out.extend_from_slice(data);
}

struct PoolWriter {
	data: Vec<u8>,
	/// Index of the next entry, which is also the `constant_pool_count` to write.
	next: u16,
	entries: HashMap<Vec<u8>, u16>,
}

impl Default for PoolWriter {
	fn default() -> Self {
		PoolWriter {
			data: Vec::new(),
			next: 1,
			entries: HashMap::new(),
		}
	}
}

impl PoolWriter {
	fn add(&mut self, entry: Vec<u8>) -> u16 {
		if let Some(index) = self.entries.get(&entry) {
			return *index;
		}

		let index = self.next;
		// long and double take two slots
		self.next += if matches!(entry[0], 5 | 6) { 2 } else { 1 };
		self.data.extend_from_slice(&entry);
		self.entries.insert(entry, index);
		index
	}

	fn utf8(&mut self, text: &str) -> u16 {
		let mut entry = vec![1];
		entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
		entry.extend_from_slice(text.as_bytes());
		self.add(entry)
	}

	fn class(&mut self, name: &str) -> u16 {
		let name = self.utf8(name);
		let mut entry = vec![7];
		entry.extend_from_slice(&name.to_be_bytes());
		self.add(entry)
	}

	fn value(&mut self, value: &ConstantValue) -> u16 {
		let mut entry = Vec::new();
		match value {
			ConstantValue::Int(value) => {
				entry.push(3);
				entry.extend_from_slice(&value.to_be_bytes());
			}
			ConstantValue::Float(value) => {
				entry.push(4);
				entry.extend_from_slice(&value.to_be_bytes());
			}
			ConstantValue::Long(value) => {
				entry.push(5);
				entry.extend_from_slice(&value.to_be_bytes());
			}
			ConstantValue::Double(value) => {
				entry.push(6);
				entry.extend_from_slice(&value.to_be_bytes());
			}
			ConstantValue::String(text) => {
				let text = self.utf8(text);
				entry.push(8);
				entry.extend_from_slice(&text.to_be_bytes());
			}
		}
		self.add(entry)
	}
}
